//! Captured QRIS catalog template and fallback image, cached in memory.
//!
//! The template is a raw message structure saved by the `saveqris` owner
//! command and relayed verbatim later; this store treats it as opaque apart
//! from requiring a `productMessage` field before it may be used.

use std::{
    path::PathBuf,
    sync::{Arc, RwLock},
};

use {
    lapak_common::Result,
    serde_json::Value,
    tracing::{debug, warn},
};

const TEMPLATE_FIELD: &str = "productMessage";

/// In-memory cache of the QRIS delivery assets.
pub struct QrisCache {
    template_path: PathBuf,
    image_path: PathBuf,
    template: RwLock<Option<Value>>,
    image: RwLock<Option<Arc<Vec<u8>>>>,
}

impl QrisCache {
    /// Load both assets. Either may be absent; failures are logged and leave
    /// the corresponding cache empty.
    #[must_use]
    pub fn load(template_path: impl Into<PathBuf>, image_path: impl Into<PathBuf>) -> Self {
        let template_path = template_path.into();
        let image_path = image_path.into();

        let template = match std::fs::read_to_string(&template_path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => {
                    debug!(path = %template_path.display(), "QRIS template cached");
                    Some(value)
                },
                Err(e) => {
                    warn!(path = %template_path.display(), error = %e, "corrupt QRIS template ignored");
                    None
                },
            },
            Err(_) => None,
        };

        let image = match std::fs::read(&image_path) {
            Ok(bytes) => {
                debug!(path = %image_path.display(), bytes = bytes.len(), "QRIS image cached");
                Some(Arc::new(bytes))
            },
            Err(_) => None,
        };

        Self {
            template_path,
            image_path,
            template: RwLock::new(template),
            image: RwLock::new(image),
        }
    }

    /// The cached template, if present and carrying the required
    /// `productMessage` field.
    #[must_use]
    pub fn template(&self) -> Option<Value> {
        self.template
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .filter(|t| t.get(TEMPLATE_FIELD).is_some())
    }

    /// Overwrite the template file wholesale and refresh the cache.
    pub fn save_template(&self, wrapper: &Value) -> Result<()> {
        std::fs::write(&self.template_path, serde_json::to_string_pretty(wrapper)?)?;
        *self.template.write().unwrap_or_else(|e| e.into_inner()) = Some(wrapper.clone());
        debug!(path = %self.template_path.display(), "QRIS template saved");
        Ok(())
    }

    /// The cached image bytes. When nothing was cached at startup, the file
    /// is tried again once per call; the operator may drop it in later.
    #[must_use]
    pub fn image(&self) -> Option<Arc<Vec<u8>>> {
        if let Some(bytes) = self
            .image
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Some(bytes);
        }

        match std::fs::read(&self.image_path) {
            Ok(bytes) => {
                let bytes = Arc::new(bytes);
                *self.image.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&bytes));
                Some(bytes)
            },
            Err(_) => None,
        }
    }

    /// Extract the relayable wrapper from a raw message: the message itself,
    /// or its quoted message, whichever carries `productMessage`.
    #[must_use]
    pub fn find_product_message(raw: &Value) -> Option<Value> {
        if raw.get(TEMPLATE_FIELD).is_some() {
            return Some(raw.clone());
        }
        let quoted = raw.pointer("/extendedTextMessage/contextInfo/quotedMessage")?;
        quoted.get(TEMPLATE_FIELD).is_some().then(|| quoted.clone())
    }
}
