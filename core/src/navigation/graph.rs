use serde::Serialize;

use crate::state::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GraphKind {
    /// Session still being read; only a loading indicator is shown.
    Loading,
    Auth,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    Loading,
    Login,
    Register,
    Home,
    Favourites,
    Profile,
    Details,
}

impl GraphKind {
    pub fn initial_route(self) -> Route {
        match self {
            Self::Loading => Route::Loading,
            Self::Auth => Route::Login,
            Self::Main => Route::Home,
        }
    }

    pub fn routes(self) -> &'static [Route] {
        match self {
            Self::Loading => &[Route::Loading],
            Self::Auth => &[Route::Login, Route::Register],
            Self::Main => &[Route::Home, Route::Favourites, Route::Profile, Route::Details],
        }
    }

    pub fn contains(self, route: Route) -> bool {
        self.routes().contains(&route)
    }
}

/// Which graph a session phase makes reachable.
pub fn graph_for(phase: SessionPhase) -> GraphKind {
    match phase {
        SessionPhase::Initializing => GraphKind::Loading,
        SessionPhase::Unauthenticated => GraphKind::Auth,
        SessionPhase::Authenticated => GraphKind::Main,
    }
}
