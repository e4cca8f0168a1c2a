//! Unit tests for the session module.

use super::*;
use tempfile::TempDir;

mod session_manager_tests {
    use super::*;

    #[test]
    fn starts_signed_out_without_header() {
        let session = SessionManager::in_memory();
        assert!(!session.is_signed_in());
        assert_eq!(session.current_credential_header(), None);
    }

    #[test]
    fn begin_sets_bearer_header_and_routes_to_inventory() {
        let mut session = SessionManager::in_memory();
        session.begin("abc123".to_string());

        assert!(session.is_signed_in());
        assert_eq!(
            session.current_credential_header().as_deref(),
            Some("Bearer abc123")
        );
        assert_eq!(session.take_pending_route(), Some(Route::Inventory));
        assert_eq!(session.take_pending_route(), None);
    }

    #[test]
    fn force_logout_clears_token_and_routes_to_login() {
        let mut session = SessionManager::in_memory();
        session.begin("abc123".to_string());
        session.take_pending_route();

        session.force_logout();

        assert!(!session.is_signed_in());
        assert_eq!(session.current_credential_header(), None);
        assert_eq!(session.pending_route(), Some(Route::Login));
        assert_eq!(session.last_logout(), Some(LogoutReason::Expired));
    }

    #[test]
    fn user_logout_is_distinguished_from_expiry() {
        let mut session = SessionManager::in_memory();
        session.begin("t".to_string());
        session.logout();
        assert_eq!(session.last_logout(), Some(LogoutReason::UserRequested));
        assert_eq!(session.take_pending_route(), Some(Route::Login));
    }

    #[test]
    fn restore_without_token_routes_to_login() {
        let mut session = SessionManager::in_memory();
        assert!(!session.restore());
        assert_eq!(session.pending_route(), Some(Route::Login));
    }

    #[test]
    fn debug_output_hides_token() {
        let mut session = SessionManager::in_memory();
        session.begin("super-secret".to_string());
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("signed_in: true"));
    }
}

mod file_store_tests {
    use super::*;

    #[test]
    fn token_survives_across_managers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session");

        let mut first = SessionManager::new(Box::new(FileSessionStore::new(&path)));
        first.begin("persisted".to_string());
        assert!(path.exists());

        let mut second = SessionManager::new(Box::new(FileSessionStore::new(&path)));
        assert!(second.restore());
        assert_eq!(
            second.current_credential_header().as_deref(),
            Some("Bearer persisted")
        );
    }

    #[test]
    fn logout_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");

        let mut session = SessionManager::new(Box::new(FileSessionStore::new(&path)));
        session.begin("t".to_string());
        session.force_logout();

        assert!(!path.exists());
        let mut again = SessionManager::new(Box::new(FileSessionStore::new(&path)));
        assert!(!again.restore());
    }

    #[test]
    fn clearing_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSessionStore::new(dir.path().join("absent"));
        assert!(store.clear().is_ok());
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory_client").join("session");
        let mut store = FileSessionStore::new(&path);
        store.save("secret-bearer").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file mode {:o}", mode & 0o777);
        assert_eq!(store.load().unwrap().as_deref(), Some("secret-bearer"));
    }

    #[cfg(unix)]
    #[test]
    fn overwriting_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = FileSessionStore::new(&path);
        store.save("new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn blank_file_counts_as_no_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "  \n").unwrap();
        let store = FileSessionStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
    }
}
