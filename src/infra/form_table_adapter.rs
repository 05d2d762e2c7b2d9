//! In-memory form table
//!
//! Identifiers take the form `Plugin.esp|0x000D62`: a package name from the
//! load order and a hex local id. The package's load-order index becomes the
//! high byte of the [`FormId`].

use std::collections::HashMap;

use crate::app::ports::FormResolver;
use crate::constants::IDENTIFIER_SEPARATOR;
use crate::error::{Result, TagError};
use crate::infra::LoadOrder;
use crate::types::FormId;

const LOCAL_ID_MASK: u32 = 0x00FF_FFFF;
// Index 0xFF is reserved for forms created at runtime
const MAX_PLUGIN_INDEX: usize = 0xFE;

pub struct FormTable {
    load_order: LoadOrder,
    known: HashMap<FormId, String>,
    accept_all: bool,
}

impl FormTable {
    pub fn new(load_order: LoadOrder) -> Self {
        Self {
            load_order,
            known: HashMap::new(),
            accept_all: false,
        }
    }

    /// Resolve any local id of a loaded package, not just inserted ones
    pub fn accept_all_local_ids(mut self) -> Self {
        self.accept_all = true;
        self
    }

    pub fn load_order(&self) -> &LoadOrder {
        &self.load_order
    }

    /// Register a form by identifier and return its id
    pub fn insert(&mut self, identifier: &str) -> Result<FormId> {
        let (plugin, local) = parse_identifier(identifier)?;
        let form = self.form_id_for(plugin, local).ok_or_else(|| {
            TagError::Identifier(format!("'{}' is not in the load order", plugin))
        })?;
        self.known.insert(form, identifier.trim().to_string());
        Ok(form)
    }

    pub fn form_id_for(&self, plugin: &str, local: u32) -> Option<FormId> {
        let index = self.load_order.index_of(plugin)?;
        if index > MAX_PLUGIN_INDEX {
            return None;
        }
        Some(FormId(((index as u32) << 24) | (local & LOCAL_ID_MASK)))
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl FormResolver for FormTable {
    type Form = String;

    fn resolve_identifier(&self, identifier: &str) -> Option<FormId> {
        let (plugin, local) = parse_identifier(identifier).ok()?;
        let form = self.form_id_for(plugin, local)?;
        (self.accept_all || self.known.contains_key(&form)).then_some(form)
    }

    fn lookup(&self, form: FormId) -> Option<String> {
        if let Some(identifier) = self.known.get(&form) {
            return Some(identifier.clone());
        }
        if !self.accept_all {
            return None;
        }
        let plugin = self.load_order.packages().get((form.raw() >> 24) as usize)?;
        Some(format!(
            "{}{}0x{:06X}",
            plugin,
            IDENTIFIER_SEPARATOR,
            form.raw() & LOCAL_ID_MASK
        ))
    }
}

/// Split `Plugin.esp|0x000D62` into the plugin name and local id
pub fn parse_identifier(identifier: &str) -> Result<(&str, u32)> {
    let invalid = || TagError::Identifier(identifier.to_string());

    let (plugin, local) = identifier
        .trim()
        .split_once(IDENTIFIER_SEPARATOR)
        .ok_or_else(invalid)?;
    let plugin = plugin.trim();
    let local = local.trim();
    let hex = local
        .strip_prefix("0x")
        .or_else(|| local.strip_prefix("0X"))
        .unwrap_or(local);
    if plugin.is_empty() || hex.is_empty() {
        return Err(invalid());
    }
    let local = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    Ok((plugin, local))
}
