/// Navigation state machine
///
/// Selects which of the three screens is visible and tells the shell what
/// to do about the capture device when screens change. The machine knows
/// nothing about rendering; `main.rs` executes the returned effects.

/// Which screen is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Menu,
    FolderContents,
    Scanning,
}

/// Named navigation actions
#[derive(Debug, Clone, PartialEq)]
pub enum NavAction {
    /// Select or create a folder and show its contents
    OpenFolder(String),
    /// Begin scanning into the active folder
    StartScan,
    /// The capture device could not be acquired; fall back
    CameraFailed,
    /// Leave the current screen
    GoBack,
}

/// Side effects the shell must run after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEffect {
    /// Re-derive the folder index from the store
    RefreshIndex,
    /// Acquire the capture device for scanning
    AcquireCamera,
    /// Release the capture device (stop its stream)
    ReleaseCamera,
}

/// The screen selector and active-folder holder.
pub struct Navigator {
    view: View,
    active_folder: Option<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Navigator {
            view: View::Menu,
            active_folder: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The folder operations currently target.
    ///
    /// The value is kept when navigating back to the menu, so re-opening the
    /// same folder does not re-prompt; folder-dependent operations are only
    /// reachable from the screens that show one.
    pub fn active_folder(&self) -> Option<&str> {
        self.active_folder.as_deref()
    }

    /// Apply a navigation action and return the effects to run.
    ///
    /// Invalid state/action combinations leave the machine untouched and
    /// return no effects; folder-dependent rejections (like capturing from
    /// the menu) happen at the operation itself, not here.
    pub fn apply(&mut self, action: NavAction) -> Vec<NavEffect> {
        match (self.view, action) {
            (View::Menu, NavAction::OpenFolder(name)) => {
                self.active_folder = Some(name);
                self.view = View::FolderContents;
                vec![NavEffect::RefreshIndex]
            }
            (View::FolderContents, NavAction::StartScan) => {
                self.view = View::Scanning;
                vec![NavEffect::AcquireCamera]
            }
            // Acquisition failure aborts entry into scanning and returns
            // to the prior screen.
            (View::Scanning, NavAction::CameraFailed) => {
                self.view = View::FolderContents;
                Vec::new()
            }
            (View::Scanning, NavAction::GoBack) => {
                self.view = View::Menu;
                vec![NavEffect::ReleaseCamera, NavEffect::RefreshIndex]
            }
            (View::FolderContents, NavAction::GoBack) => {
                self.view = View::Menu;
                vec![NavEffect::RefreshIndex]
            }
            (_, _) => Vec::new(),
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_menu_with_no_folder() {
        let nav = Navigator::new();
        assert_eq!(nav.view(), View::Menu);
        assert!(nav.active_folder().is_none());
    }

    #[test]
    fn test_open_folder_selects_and_shows_contents() {
        let mut nav = Navigator::new();
        let effects = nav.apply(NavAction::OpenFolder("roll_a".to_string()));

        assert_eq!(nav.view(), View::FolderContents);
        assert_eq!(nav.active_folder(), Some("roll_a"));
        assert_eq!(effects, vec![NavEffect::RefreshIndex]);
    }

    #[test]
    fn test_start_scan_acquires_camera() {
        let mut nav = Navigator::new();
        nav.apply(NavAction::OpenFolder("roll_a".to_string()));
        let effects = nav.apply(NavAction::StartScan);

        assert_eq!(nav.view(), View::Scanning);
        assert_eq!(effects, vec![NavEffect::AcquireCamera]);
    }

    #[test]
    fn test_back_from_scanning_releases_camera_and_returns_to_menu() {
        let mut nav = Navigator::new();
        nav.apply(NavAction::OpenFolder("roll_a".to_string()));
        nav.apply(NavAction::StartScan);
        let effects = nav.apply(NavAction::GoBack);

        assert_eq!(nav.view(), View::Menu);
        assert_eq!(
            effects,
            vec![NavEffect::ReleaseCamera, NavEffect::RefreshIndex]
        );
    }

    #[test]
    fn test_camera_failure_falls_back_to_folder_contents() {
        let mut nav = Navigator::new();
        nav.apply(NavAction::OpenFolder("roll_a".to_string()));
        nav.apply(NavAction::StartScan);
        let effects = nav.apply(NavAction::CameraFailed);

        assert_eq!(nav.view(), View::FolderContents);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_active_folder_survives_back_navigation() {
        let mut nav = Navigator::new();
        nav.apply(NavAction::OpenFolder("roll_a".to_string()));
        nav.apply(NavAction::GoBack);

        assert_eq!(nav.view(), View::Menu);
        assert_eq!(nav.active_folder(), Some("roll_a"));
    }

    #[test]
    fn test_out_of_state_actions_change_nothing() {
        let mut nav = Navigator::new();

        assert!(nav.apply(NavAction::StartScan).is_empty());
        assert_eq!(nav.view(), View::Menu);

        assert!(nav.apply(NavAction::GoBack).is_empty());
        assert_eq!(nav.view(), View::Menu);

        nav.apply(NavAction::OpenFolder("roll_a".to_string()));
        assert!(nav
            .apply(NavAction::OpenFolder("roll_b".to_string()))
            .is_empty());
        assert_eq!(nav.active_folder(), Some("roll_a"));
    }
}
