//! Persisted sets of article ids shared by the note and scrap pages.

use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;

const SELECTED_KEY: &str = "selectedArticleIds";
const SCRAPPED_KEY: &str = "scrappedArticleIds";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("browser storage unavailable")]
	Unavailable,

	#[error("storage rejected change to {key}: {reason}")]
	Write { key: String, reason: String },

	#[error("could not encode article ids: {0}")]
	Encode(#[from] serde_json::Error),
}

/// Key/value persistence behind an [`ArticleSet`].
pub trait SetStorage {
	fn load(&self, key: &str) -> Option<String>;
	fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: SetStorage + ?Sized> SetStorage for &T {
	fn load(&self, key: &str) -> Option<String> {
		(**self).load(key)
	}

	fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
		(**self).save(key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		(**self).remove(key)
	}
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
	entries: RefCell<HashMap<String, String>>,
}

impl SetStorage for MemoryStorage {
	fn load(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}

	fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.entries.borrow_mut().remove(key);
		Ok(())
	}
}

/// The browser's `localStorage`.
pub struct LocalStorage {
	storage: web_sys::Storage,
}

impl LocalStorage {
	pub fn open() -> Result<Self, StoreError> {
		let window = web_sys::window().ok_or(StoreError::Unavailable)?;
		let storage = window
			.local_storage()
			.ok()
			.flatten()
			.ok_or(StoreError::Unavailable)?;
		Ok(Self { storage })
	}
}

impl SetStorage for LocalStorage {
	fn load(&self, key: &str) -> Option<String> {
		self.storage.get_item(key).ok().flatten()
	}

	fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.storage
			.set_item(key, value)
			.map_err(|e| StoreError::Write {
				key: key.to_string(),
				reason: format!("{e:?}"),
			})
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.storage
			.remove_item(key)
			.map_err(|e| StoreError::Write {
				key: key.to_string(),
				reason: format!("{e:?}"),
			})
	}
}

/// An ordered, duplicate-free set of article ids persisted as a JSON array.
pub struct ArticleSet<S> {
	key: &'static str,
	storage: S,
}

impl<S: SetStorage> ArticleSet<S> {
	/// Articles picked as sources for a new note.
	pub fn selected(storage: S) -> Self {
		Self {
			key: SELECTED_KEY,
			storage,
		}
	}

	pub fn scrapped(storage: S) -> Self {
		Self {
			key: SCRAPPED_KEY,
			storage,
		}
	}

	pub fn ids(&self) -> Vec<i64> {
		let Some(raw) = self.storage.load(self.key) else {
			return Vec::new();
		};
		serde_json::from_str(&raw).unwrap_or_else(|err| {
			warn!("ignoring corrupt {}: {err}", self.key);
			Vec::new()
		})
	}

	pub fn contains(&self, id: i64) -> bool {
		self.ids().contains(&id)
	}

	/// Returns whether the id was newly added.
	pub fn add(&self, id: i64) -> Result<bool, StoreError> {
		let mut ids = self.ids();
		if ids.contains(&id) {
			return Ok(false);
		}
		ids.push(id);
		self.write(&ids)?;
		Ok(true)
	}

	pub fn remove(&self, id: i64) -> Result<(), StoreError> {
		let mut ids = self.ids();
		ids.retain(|&x| x != id);
		self.write(&ids)
	}

	pub fn clear(&self) -> Result<(), StoreError> {
		self.storage.remove(self.key)
	}

	fn write(&self, ids: &[i64]) -> Result<(), StoreError> {
		let raw = serde_json::to_string(ids)?;
		self.storage.save(self.key, &raw)
	}
}
