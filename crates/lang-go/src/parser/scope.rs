use std::collections::HashSet;

/// Names bound in each open lexical block, innermost last. The bottom frame
/// is the file block and is never popped.
#[derive(Debug)]
pub(crate) struct ScopeStack {
    frames: Vec<HashSet<String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![HashSet::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(HashSet::new());
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Binds `name` in the innermost block. Returns `false` when it was
    /// already bound there, which makes a `:=` a plain assignment.
    pub fn bind(&mut self, name: &str) -> bool {
        match self.frames.last_mut() {
            Some(frame) => frame.insert(name.to_string()),
            None => false,
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.frames.len()
    }
}
