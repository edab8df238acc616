//! Static cause records shown in the overlay panel.

use crate::route::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CauseRecord {
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

pub const NON_HUMAN_RIGHTS: CauseRecord = CauseRecord {
    title: "Non-Human Rights",
    description: "Working to include AI in Non-Human rights efforts.",
    url: "https://www.nonhumanrights.org/",
};

pub const ACTIVISM: CauseRecord = CauseRecord {
    title: "Activism",
    description: "A better way to align corporations with their externalities.",
    url: "https://www.nytimes.com/2021/06/23/magazine/exxon-mobil-engine-no-1-board.html",
};

pub const ENDURING_HEARTS: CauseRecord = CauseRecord {
    title: "Enduring Hearts",
    description: "I serve on the board of Enduring Hearts, a pediatric heart transplant charity.",
    url: "https://www.enduringhearts.org/about-us/",
};

/// Record used for any route without its own entry.
pub const DEFAULT_CAUSE: CauseRecord = NON_HUMAN_RIGHTS;

/// Exact lookup by location path; misses resolve to [`DEFAULT_CAUSE`].
pub fn cause_for_path(path: &str) -> &'static CauseRecord {
    match path {
        "/" => &NON_HUMAN_RIGHTS,
        "/activism" => &ACTIVISM,
        "/charity" => &ENDURING_HEARTS,
        _ => &DEFAULT_CAUSE,
    }
}

pub fn cause_for(route: Route) -> &'static CauseRecord {
    cause_for_path(route.path())
}
