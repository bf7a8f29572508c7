//! Route table and navigation gate.
//!
//! Every screen change goes through `NavigationGate::resolve`, which runs
//! synchronously in the input handler before the next draw. Routes flagged
//! `requires_auth` redirect to the login route when the session holds no
//! token; everything else proceeds unchanged.

use crate::auth::Session;

/// The screens a route can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Accounts,
    Transfers,
    Audit,
    Login,
}

impl Screen {
    /// Get the display title for this screen.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Accounts => "Accounts",
            Screen::Transfers => "Transfers",
            Screen::Audit => "Audit",
            Screen::Login => "Login",
        }
    }

    /// Get the next tabbed screen (wrapping around; Login is not in the
    /// tab cycle)
    pub fn next(&self) -> Self {
        match self {
            Screen::Home => Screen::Accounts,
            Screen::Accounts => Screen::Transfers,
            Screen::Transfers => Screen::Audit,
            Screen::Audit => Screen::Home,
            Screen::Login => Screen::Home,
        }
    }

    /// Get the previous tabbed screen (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Screen::Home => Screen::Audit,
            Screen::Accounts => Screen::Home,
            Screen::Transfers => Screen::Accounts,
            Screen::Audit => Screen::Transfers,
            Screen::Login => Screen::Home,
        }
    }
}

/// One entry in the route table
#[derive(Debug, Clone, Copy)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub screen: Screen,
    pub requires_auth: bool,
}

/// The ordered route table, with one route designated as the login
/// destination for redirects.
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    login: Screen,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>, login: Screen) -> Self {
        debug_assert!(routes.iter().any(|r| r.screen == login));
        Self { routes, login }
    }

    pub fn find(&self, screen: Screen) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.screen == screen)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn login_screen(&self) -> Screen {
        self.login
    }
}

impl Default for RouteTable {
    /// The application route table. Mirrors the backend's page structure:
    /// the home screen is public, everything that shows account data
    /// requires an authenticated session.
    fn default() -> Self {
        Self::new(
            vec![
                RouteDescriptor {
                    path: "/",
                    screen: Screen::Home,
                    requires_auth: false,
                },
                RouteDescriptor {
                    path: "/accounts",
                    screen: Screen::Accounts,
                    requires_auth: true,
                },
                RouteDescriptor {
                    path: "/transfers",
                    screen: Screen::Transfers,
                    requires_auth: true,
                },
                RouteDescriptor {
                    path: "/audit",
                    screen: Screen::Audit,
                    requires_auth: true,
                },
                RouteDescriptor {
                    path: "/login",
                    screen: Screen::Login,
                    requires_auth: false,
                },
            ],
            Screen::Login,
        )
    }
}

/// Outcome of a gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The requested screen may render
    Proceed(Screen),
    /// The request was for a protected screen without a session; render
    /// the login screen instead
    Redirect(Screen),
}

/// The guard evaluated before each screen transition
pub struct NavigationGate {
    table: RouteTable,
}

impl NavigationGate {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Decide whether `target` may render for the given session.
    ///
    /// A target missing from the table is treated as public; the table is
    /// built in this crate, so that arm only matters for future screens.
    pub fn resolve(&self, target: Screen, session: &Session) -> Resolution {
        let requires_auth = self
            .table
            .find(target)
            .map(|r| r.requires_auth)
            .unwrap_or(false);

        if requires_auth && !session.is_authenticated() {
            Resolution::Redirect(self.table.login_screen())
        } else {
            Resolution::Proceed(target)
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

impl Default for NavigationGate {
    fn default() -> Self {
        Self::new(RouteTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionData;
    use chrono::Utc;
    use tempfile::tempdir;

    fn logged_in_session(dir: &std::path::Path) -> Session {
        let mut session = Session::new(dir.to_path_buf());
        session.login(SessionData {
            token: "tok".to_string(),
            username: "jdoe".to_string(),
            roles: vec![],
            created_at: Utc::now(),
        });
        session
    }

    #[test]
    fn test_protected_route_redirects_when_unauthenticated() {
        let dir = tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        let gate = NavigationGate::default();

        assert_eq!(
            gate.resolve(Screen::Accounts, &session),
            Resolution::Redirect(Screen::Login)
        );
        assert_eq!(
            gate.resolve(Screen::Audit, &session),
            Resolution::Redirect(Screen::Login)
        );
    }

    #[test]
    fn test_protected_route_proceeds_when_authenticated() {
        let dir = tempdir().unwrap();
        let session = logged_in_session(dir.path());
        let gate = NavigationGate::default();

        assert_eq!(
            gate.resolve(Screen::Accounts, &session),
            Resolution::Proceed(Screen::Accounts)
        );
    }

    #[test]
    fn test_public_route_always_proceeds() {
        let dir = tempdir().unwrap();
        let gate = NavigationGate::default();

        let anonymous = Session::new(dir.path().to_path_buf());
        assert_eq!(
            gate.resolve(Screen::Home, &anonymous),
            Resolution::Proceed(Screen::Home)
        );

        let session = logged_in_session(dir.path());
        assert_eq!(
            gate.resolve(Screen::Home, &session),
            Resolution::Proceed(Screen::Home)
        );
    }

    #[test]
    fn test_login_route_never_redirects() {
        let dir = tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        let gate = NavigationGate::default();

        assert_eq!(
            gate.resolve(Screen::Login, &session),
            Resolution::Proceed(Screen::Login)
        );
    }

    #[test]
    fn test_redirect_target_is_the_designated_login_route() {
        let dir = tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        let gate = NavigationGate::default();

        for screen in [Screen::Accounts, Screen::Transfers, Screen::Audit] {
            match gate.resolve(screen, &session) {
                Resolution::Redirect(s) => assert_eq!(s, gate.table().login_screen()),
                other => panic!("expected redirect for {:?}, got {:?}", screen, other),
            }
        }
    }

    #[test]
    fn test_route_lookup_by_path() {
        let table = RouteTable::default();
        let route = table.find_by_path("/accounts").unwrap();
        assert_eq!(route.screen, Screen::Accounts);
        assert!(route.requires_auth);
        assert!(table.find_by_path("/nope").is_none());
    }

    #[test]
    fn test_screen_cycle_wraps() {
        assert_eq!(Screen::Home.next(), Screen::Accounts);
        assert_eq!(Screen::Audit.next(), Screen::Home);
        assert_eq!(Screen::Home.prev(), Screen::Audit);
        assert_eq!(Screen::Accounts.prev(), Screen::Home);
    }
}
