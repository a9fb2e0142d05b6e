use std::cell::RefCell;
use std::rc::Rc;

use super::DerivedData;

/// Drawing backend. Receives every view's derived data once per refresh.
pub trait Renderer {
    fn begin_pass(&mut self, _pass: u64) {}

    fn draw(&mut self, view: &str, data: &DerivedData);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _view: &str, _data: &DerivedData) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub pass: u64,
    pub view: String,
    pub data: DerivedData,
}

/// Keeps every drawn frame. Clones share the same frame list, so a handle
/// kept outside the dashboard sees what the dashboard drew.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pass: u64,
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    /// Frames drawn in the most recent pass, in draw order.
    pub fn last_pass(&self) -> Vec<Frame> {
        let frames = self.frames.borrow();
        let Some(last) = frames.last().map(|frame| frame.pass) else {
            return Vec::new();
        };
        frames
            .iter()
            .filter(|frame| frame.pass == last)
            .cloned()
            .collect()
    }

    /// Latest data drawn by the named view.
    pub fn latest(&self, view: &str) -> Option<DerivedData> {
        self.frames
            .borrow()
            .iter()
            .rev()
            .find(|frame| frame.view == view)
            .map(|frame| frame.data.clone())
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn begin_pass(&mut self, pass: u64) {
        self.pass = pass;
    }

    fn draw(&mut self, view: &str, data: &DerivedData) {
        self.frames.borrow_mut().push(Frame {
            pass: self.pass,
            view: view.to_string(),
            data: data.clone(),
        });
    }
}
