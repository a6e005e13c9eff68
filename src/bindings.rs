//! Registry of live event handlers
//!
//! Every interactive target gets at most one handler. A surface stores the
//! handle of each listener it attaches under a [`Binding`] key; binding a key
//! again hands back the previous handle so it can be released first.

use std::collections::HashMap;

use crate::tree::EntryId;

/// Interactive targets of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Open trigger, bound once at init
    Open,
    /// Expand control of an entry with children
    Entry(EntryId),
    Back,
    Close,
    Backdrop,
    /// Document-level keydown listener
    Keyboard,
}

/// Live handlers keyed by target
#[derive(Debug)]
pub struct BindingRegistry<H> {
    live: HashMap<Binding, H>,
}

impl<H> Default for BindingRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> BindingRegistry<H> {
    pub fn new() -> Self {
        Self {
            live: HashMap::new(),
        }
    }

    /// Store `handle` under `binding`, returning the handle it replaces
    pub fn bind(&mut self, binding: Binding, handle: H) -> Option<H> {
        self.live.insert(binding, handle)
    }

    pub fn unbind(&mut self, binding: Binding) -> Option<H> {
        self.live.remove(&binding)
    }

    pub fn is_bound(&self, binding: Binding) -> bool {
        self.live.contains_key(&binding)
    }

    pub fn get(&self, binding: Binding) -> Option<&H> {
        self.live.get(&binding)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.live.keys().copied()
    }

    /// Remove every binding
    pub fn drain(&mut self) -> Vec<(Binding, H)> {
        self.live.drain().collect()
    }
}
