use std::time::Duration;

use crate::{
    domain::settings::MediaDir,
    infra::{
        contracts::{PreferenceStore, Relauncher},
        fs_cleanup::remove_dir_best_effort,
        preferences::{APP_SETTINGS_STORE, LOGIN_STORE},
        storage_layout::StorageLayout,
    },
};

/// Confirmation shown after every destructive action, whether or not anything was removed.
pub const SUCCESS_NOTICE: &str = "Successful";

const PREFERENCE_CLEAR_FAILED: &str = "PREFERENCE_CLEAR_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub media_removed: bool,
    pub cache_removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetOutcome {
    pub cache_removed: bool,
    pub files_removed: bool,
    pub stores_cleared: usize,
}

pub fn clear_cache(layout: &StorageLayout) -> ClearOutcome {
    let cache_removed = remove_dir_best_effort(&layout.cache_dir);
    tracing::info!(cache_removed, "cache cleared");

    ClearOutcome {
        media_removed: false,
        cache_removed,
    }
}

/// Deletes one media subdirectory of the chat library, then the app cache.
pub fn clear_media(layout: &StorageLayout, media: MediaDir) -> ClearOutcome {
    let media_removed = remove_dir_best_effort(&layout.media_dir(media));
    let cache_removed = remove_dir_best_effort(&layout.cache_dir);
    tracing::info!(
        media = media.dir_name(),
        media_removed,
        cache_removed,
        "media cleared"
    );

    ClearOutcome {
        media_removed,
        cache_removed,
    }
}

/// Wipes cache, files and both named preference stores, then schedules a relaunch.
pub fn reset_app(
    layout: &StorageLayout,
    preferences: &mut dyn PreferenceStore,
    relauncher: &dyn Relauncher,
    relaunch_delay: Duration,
) -> ResetOutcome {
    let cache_removed = remove_dir_best_effort(&layout.cache_dir);
    let files_removed = remove_dir_best_effort(&layout.files_dir);

    let mut stores_cleared = 0;
    for store in [LOGIN_STORE, APP_SETTINGS_STORE] {
        match preferences.clear(store) {
            Ok(()) => stores_cleared += 1,
            Err(error) => tracing::warn!(
                code = PREFERENCE_CLEAR_FAILED,
                store,
                error = %error,
                "preference store could not be cleared"
            ),
        }
    }

    tracing::info!(cache_removed, files_removed, stores_cleared, "app reset");
    relauncher.schedule(relaunch_delay);

    ResetOutcome {
        cache_removed,
        files_removed,
        stores_cleared,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::infra::{
        preferences::{KEY_DATA_COLLECTION, KEY_IS_LOGGED_IN},
        stubs::{MemoryPreferenceStore, RecordingRelauncher},
    };

    fn populated_layout(root: &std::path::Path) -> StorageLayout {
        let layout = StorageLayout::under_root(root);
        layout.ensure_dirs().expect("dirs should be created");
        fs::write(layout.cache_dir.join("blob"), b"x").expect("cache file");
        fs::write(layout.files_dir.join("db.sqlite"), b"x").expect("files file");
        for media in MediaDir::ALL {
            let dir = layout.media_dir(media);
            fs::create_dir_all(&dir).expect("media dir");
            fs::write(dir.join("item"), b"x").expect("media file");
        }
        layout
    }

    #[test]
    fn clear_cache_removes_only_cache_dir() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = populated_layout(root.path());

        let outcome = clear_cache(&layout);

        assert!(outcome.cache_removed);
        assert!(!layout.cache_dir.exists());
        assert!(layout.files_dir.exists());
        assert!(layout.media_dir(MediaDir::Photos).exists());
    }

    #[test]
    fn clear_media_removes_target_subdir_and_cache() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = populated_layout(root.path());

        let outcome = clear_media(&layout, MediaDir::Photos);

        assert_eq!(
            outcome,
            ClearOutcome {
                media_removed: true,
                cache_removed: true,
            }
        );
        assert!(!layout.media_dir(MediaDir::Photos).exists());
        assert!(layout.media_dir(MediaDir::Videos).exists());
        assert!(layout.media_dir(MediaDir::Thumbnails).exists());
        assert!(layout.media_dir(MediaDir::Temp).exists());
        assert!(!layout.cache_dir.exists());
    }

    #[test]
    fn clear_media_with_missing_targets_is_a_no_op() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under_root(root.path());

        let outcome = clear_media(&layout, MediaDir::Temp);

        assert_eq!(outcome, ClearOutcome::default());
    }

    #[test]
    fn reset_wipes_dirs_and_stores_and_schedules_one_relaunch() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = populated_layout(root.path());
        let mut preferences = MemoryPreferenceStore::default();
        preferences
            .set_bool(LOGIN_STORE, KEY_IS_LOGGED_IN, true)
            .expect("seed login");
        preferences
            .set_bool(APP_SETTINGS_STORE, KEY_DATA_COLLECTION, true)
            .expect("seed settings");
        preferences
            .set_bool("other", "kept", true)
            .expect("seed unrelated store");
        let relauncher = RecordingRelauncher::default();

        let outcome = reset_app(
            &layout,
            &mut preferences,
            &relauncher,
            Duration::from_millis(1_000),
        );

        assert!(outcome.cache_removed);
        assert!(outcome.files_removed);
        assert_eq!(outcome.stores_cleared, 2);
        assert!(!layout.cache_dir.exists());
        assert!(!layout.files_dir.exists());
        assert!(layout.media_dir(MediaDir::Photos).exists());
        assert_eq!(preferences.store_len(LOGIN_STORE), 0);
        assert_eq!(preferences.store_len(APP_SETTINGS_STORE), 0);
        assert_eq!(preferences.store_len("other"), 1);
        assert_eq!(
            *relauncher.scheduled.borrow(),
            vec![Duration::from_millis(1_000)]
        );
    }
}
