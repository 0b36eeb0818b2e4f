//! User-assigned session metadata: custom names, folders and archive flags.
//!
//! The indexer and search never consult this; it exists for whoever renders sessions.
//! Persistence is up to the implementor of [`SessionOverlay`]; [`MemoryOverlay`] keeps
//! everything in process.

use std::collections::{HashMap, HashSet};

use crate::models::Session;
use crate::naming::Namer;

/// Lookup and update of per-session overlay values, keyed by session id
pub trait SessionOverlay {
    fn custom_name(&self, session_id: &str) -> Option<String>;
    fn custom_folder(&self, session_id: &str) -> Option<String>;
    fn is_archived(&self, session_id: &str) -> bool;

    /// `None` clears the name
    fn set_custom_name(&mut self, session_id: &str, name: Option<String>);
    /// `None` clears the folder
    fn set_custom_folder(&mut self, session_id: &str, folder: Option<String>);
    fn set_archived(&mut self, session_id: &str, archived: bool);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryOverlay {
    names: HashMap<String, String>,
    folders: HashMap<String, String>,
    archived: HashSet<String>,
}

impl MemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

fn set_or_clear(map: &mut HashMap<String, String>, key: &str, value: Option<String>) {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) => {
            map.insert(key.to_string(), value);
        }
        None => {
            map.remove(key);
        }
    }
}

impl SessionOverlay for MemoryOverlay {
    fn custom_name(&self, session_id: &str) -> Option<String> {
        self.names.get(session_id).cloned()
    }

    fn custom_folder(&self, session_id: &str) -> Option<String> {
        self.folders.get(session_id).cloned()
    }

    fn is_archived(&self, session_id: &str) -> bool {
        self.archived.contains(session_id)
    }

    fn set_custom_name(&mut self, session_id: &str, name: Option<String>) {
        set_or_clear(&mut self.names, session_id, name);
    }

    fn set_custom_folder(&mut self, session_id: &str, folder: Option<String>) {
        set_or_clear(&mut self.folders, session_id, folder);
    }

    fn set_archived(&mut self, session_id: &str, archived: bool) {
        if archived {
            self.archived.insert(session_id.to_string());
        } else {
            self.archived.remove(session_id);
        }
    }
}

/// Custom name if one is set, else the namer's default label
pub fn display_name(session: &Session, overlay: &dyn SessionOverlay, namer: &Namer) -> String {
    overlay.custom_name(&session.id).unwrap_or_else(|| namer.label(session))
}

/// Sessions not marked archived, order preserved
pub fn visible_sessions<'a>(
    sessions: &'a [Session],
    overlay: &'a dyn SessionOverlay,
) -> impl Iterator<Item = &'a Session> + 'a {
    sessions.iter().filter(move |session| !overlay.is_archived(&session.id))
}
