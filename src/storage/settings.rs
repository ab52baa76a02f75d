// Display preferences and the selected-contact pointer.
// Flags are stored as the strings "true"/"false"; wallpapers as their names.

use super::{ChatStore, StoreResult};
use crate::models::Wallpaper;

/// Which view a wallpaper choice applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallpaperScope {
    List,
    Interface,
}

impl ChatStore {
    pub fn selected_contact(&self) -> StoreResult<Option<String>> {
        Ok(self.read_raw(&self.keys.selected_contact)?.filter(|id| !id.is_empty()))
    }

    pub fn set_selected_contact(&self, contact_id: &str) -> StoreResult<()> {
        self.write_raw(&self.keys.selected_contact, contact_id)
    }

    pub fn clear_selected_contact(&self) -> StoreResult<()> {
        self.remove_key(&self.keys.selected_contact)
    }

    /// Off unless explicitly stored as "true"
    pub fn dark_mode(&self) -> StoreResult<bool> {
        Ok(self.read_raw(&self.keys.dark_mode)?.as_deref() == Some("true"))
    }

    pub fn set_dark_mode(&self, enabled: bool) -> StoreResult<()> {
        self.write_raw(&self.keys.dark_mode, bool_str(enabled))
    }

    /// On unless explicitly stored as "false"
    pub fn online_status_visible(&self) -> StoreResult<bool> {
        Ok(self.read_raw(&self.keys.online_status)?.as_deref() != Some("false"))
    }

    /// Store the flag and mirror it onto every contact entry
    pub fn set_online_status_visible(&self, visible: bool) -> StoreResult<()> {
        self.write_raw(&self.keys.online_status, bool_str(visible))?;
        self.set_contacts_online_visibility(visible)
    }

    pub fn wallpaper(&self, scope: WallpaperScope) -> StoreResult<Wallpaper> {
        Ok(self
            .read_raw(self.wallpaper_key(scope))?
            .map(|value| Wallpaper::parse(&value))
            .unwrap_or_default())
    }

    /// A list choice also becomes the conversation wallpaper; an interface
    /// choice only changes the conversation view.
    pub fn set_wallpaper(&self, scope: WallpaperScope, wallpaper: Wallpaper) -> StoreResult<()> {
        if scope == WallpaperScope::List {
            self.write_raw(&self.keys.interface_wallpaper, wallpaper.as_str())?;
        }
        self.write_raw(self.wallpaper_key(scope), wallpaper.as_str())
    }

    fn wallpaper_key(&self, scope: WallpaperScope) -> &str {
        match scope {
            WallpaperScope::List => &self.keys.list_wallpaper,
            WallpaperScope::Interface => &self.keys.interface_wallpaper,
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
