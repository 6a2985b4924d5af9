#![allow(dead_code)]

use glide_animation::FrameScheduler;
use glide_motion::ElementSink;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// An element that records its inline style
#[derive(Clone, Default)]
pub struct RecordingElement {
    pub style: Rc<RefCell<IndexMap<String, String>>>,
    pub writes: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingElement {
    pub fn with_style(declarations: &[(&str, &str)]) -> Self {
        let element = Self::default();
        element.style.borrow_mut().extend(
            declarations
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        element
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.style.borrow().get(name).cloned()
    }
}

impl ElementSink for RecordingElement {
    fn inline_style(&self) -> Vec<(String, String)> {
        self.style
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn set_style(&mut self, name: &str, value: &str) {
        self.writes
            .borrow_mut()
            .push((name.to_string(), value.to_string()));
        self.style
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_style(&mut self, name: &str) {
        self.style.borrow_mut().shift_remove(name);
    }
}

/// Drives frames at a fixed 16 ms step
pub struct Clock {
    pub scheduler: FrameScheduler,
    pub now: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            scheduler: FrameScheduler::new(),
            now: 0.0,
        }
    }

    pub fn frame(&mut self) {
        self.scheduler.frame(self.now);
        self.now += 16.0;
    }

    pub fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Run frames until nothing is pending, up to ten seconds of them
    pub fn settle(&mut self) {
        for _ in 0..625 {
            let pending = self.scheduler.frame(self.now);
            self.now += 16.0;
            if !pending {
                return;
            }
        }
        panic!("scheduler still busy after 10s");
    }
}
