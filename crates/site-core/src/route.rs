//! Route model for the site.
//!
//! Every URL path resolves to one of four routes. Each route selects exactly
//! one 3D scene and one overlay set; unknown paths fall back to the root.

use crate::shapes::ShapeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Rights,
    Activism,
    Charity,
    About,
}

/// Which 3D scene is mounted for a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveScene {
    Shapes(ShapeKind),
    Aquarium,
}

/// Navigation bar entries in display order: (route, link label).
pub const NAV_LINKS: [(Route, &str); 4] = [
    (Route::Rights, "rights"),
    (Route::Activism, "activism"),
    (Route::Charity, "charity"),
    (Route::About, "about"),
];

impl Route {
    pub const ALL: [Route; 4] = [Route::Rights, Route::Activism, Route::Charity, Route::About];

    /// Resolve a location path. Total: anything unrecognised is `Rights`.
    pub fn from_path(path: &str) -> Route {
        match path {
            "/activism" => Route::Activism,
            "/charity" => Route::Charity,
            "/about" => Route::About,
            _ => Route::Rights,
        }
    }

    /// Canonical path pushed into history for this route.
    pub fn path(self) -> &'static str {
        match self {
            Route::Rights => "/",
            Route::Activism => "/activism",
            Route::Charity => "/charity",
            Route::About => "/about",
        }
    }

    /// Text shown by the status label and watermark. The root path shows its
    /// cause name instead of a bare slash.
    pub fn status_text(self) -> &'static str {
        match self {
            Route::Rights => "/rights",
            other => other.path(),
        }
    }

    pub fn scene(self) -> ActiveScene {
        match self {
            Route::Rights => ActiveScene::Shapes(ShapeKind::Knot),
            Route::Activism => ActiveScene::Shapes(ShapeKind::Torus),
            Route::Charity => ActiveScene::Shapes(ShapeKind::Dodecahedron),
            Route::About => ActiveScene::Aquarium,
        }
    }

    /// Status label, watermark and cause panel are only mounted with the
    /// shape scene.
    pub fn shows_shape_overlays(self) -> bool {
        matches!(self.scene(), ActiveScene::Shapes(_))
    }
}

/// Result of a route change, consumed by the web layer to (un)mount things.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Route,
    pub to: Route,
    /// The aquarium was just mounted.
    pub enter_aquarium: bool,
    /// The aquarium was just unmounted.
    pub leave_aquarium: bool,
    /// First time the aquarium is entered: its assets must be fetched.
    pub start_aquarium_load: bool,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Route state machine. There is no terminal state; any route can be
/// reached from any other.
#[derive(Clone, Debug, Default)]
pub struct Router {
    current: Route,
    aquarium_requested: bool,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        let mut router = Self {
            current: Route::Rights,
            aquarium_requested: false,
        };
        router.navigate(initial);
        router
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn active_scene(&self) -> ActiveScene {
        self.current.scene()
    }

    pub fn aquarium_requested(&self) -> bool {
        self.aquarium_requested
    }

    pub fn navigate_path(&mut self, path: &str) -> Transition {
        self.navigate(Route::from_path(path))
    }

    pub fn navigate(&mut self, to: Route) -> Transition {
        let from = self.current;
        let was_aquarium = from.scene() == ActiveScene::Aquarium;
        let is_aquarium = to.scene() == ActiveScene::Aquarium;
        let enter_aquarium = is_aquarium && !was_aquarium;
        let start_aquarium_load = is_aquarium && !self.aquarium_requested;
        if is_aquarium {
            self.aquarium_requested = true;
        }
        self.current = to;
        Transition {
            from,
            to,
            enter_aquarium,
            leave_aquarium: was_aquarium && !is_aquarium,
            start_aquarium_load,
        }
    }
}
