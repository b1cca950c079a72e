//! Client-side route table.
//!
//! # Design
//! `ROUTES` is a flat, ordered list of path patterns bound to views. A
//! pattern segment starting with `:` captures one non-empty path segment.
//! No two patterns overlap, so order only matters in that `/result/:id`
//! must never sit behind a more general pattern.
//!
//! Views are not loaded when the table is built. `Router::navigate`
//! resolves the path first and only then awaits the `ViewLoader`.

use std::collections::BTreeMap;
use std::future::Future;

use crate::error::RouteError;

/// Every view a route can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Scan,
    IdCard,
    Documents,
    History,
    Result,
    Login,
    Batch,
    Advanced,
    Watermark,
    Translate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

pub static ROUTES: [Route; 11] = [
    Route { path: "/", name: "Home", view: View::Home },
    Route { path: "/scan", name: "Scan", view: View::Scan },
    Route { path: "/id-card", name: "IDCard", view: View::IdCard },
    Route { path: "/documents", name: "Documents", view: View::Documents },
    Route { path: "/history", name: "History", view: View::History },
    Route { path: "/result/:id", name: "Result", view: View::Result },
    Route { path: "/login", name: "Login", view: View::Login },
    Route { path: "/batch", name: "Batch", view: View::Batch },
    Route { path: "/advanced", name: "Advanced", view: View::Advanced },
    Route { path: "/advanced/watermark", name: "Watermark", view: View::Watermark },
    Route { path: "/advanced/translate", name: "Translate", view: View::Translate },
];

/// A resolved route with its captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn name(&self) -> &'static str {
        self.route.name
    }

    pub fn view(&self) -> View {
        self.route.view
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Match a URL path against `ROUTES`. Query string and fragment are ignored
/// and a trailing slash is tolerated.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split_segments(path);
    ROUTES.iter().find_map(|route| {
        match_pattern(route.path, &segments).map(|params| RouteMatch { route, params })
    })
}

pub fn route_by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}

/// Build the path of the route named `name`, filling `:param` segments.
pub fn href(name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
    let route = route_by_name(name).ok_or_else(|| RouteError::UnknownName(name.to_string()))?;
    let mut out = String::new();
    for segment in split_segments(route.path) {
        let value = match segment.strip_prefix(':') {
            Some(param) => {
                let (_, value) = params
                    .iter()
                    .find(|(key, _)| *key == param)
                    .filter(|(_, value)| !value.is_empty())
                    .ok_or_else(|| RouteError::MissingParam(param.to_string()))?;
                urlencoding::encode(value).into_owned()
            }
            None => segment.to_string(),
        };
        out.push('/');
        out.push_str(&value);
    }
    if out.is_empty() {
        out.push('/');
    }
    Ok(out)
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let expected = split_segments(pattern);
    if expected.len() != segments.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (want, got) in expected.iter().zip(segments) {
        match want.strip_prefix(':') {
            Some(name) => {
                let value = urlencoding::decode(got)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| got.to_string());
                params.insert(name.to_string(), value);
            }
            None if want == got => {}
            None => return None,
        }
    }
    Some(params)
}

/// Loads the component behind a view on demand.
pub trait ViewLoader {
    type Output;

    fn load(&self, view: View) -> impl Future<Output = Self::Output>;
}

/// The outcome of a navigation: the matched route and its loaded view.
#[derive(Debug)]
pub struct Navigation<V> {
    pub route: RouteMatch,
    pub view: V,
}

pub struct Router<L> {
    loader: L,
}

impl<L: ViewLoader> Router<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn routes(&self) -> &'static [Route] {
        &ROUTES
    }

    pub async fn navigate(&self, path: &str) -> Result<Navigation<L::Output>, RouteError> {
        let route = resolve(path).ok_or_else(|| RouteError::NoMatch(path.to_string()))?;
        tracing::debug!(path, route = route.name(), "navigating");
        let view = self.loader.load(route.view()).await;
        Ok(Navigation { route, view })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn names_and_paths_are_unique() {
        let names: HashSet<_> = ROUTES.iter().map(|r| r.name).collect();
        let paths: HashSet<_> = ROUTES.iter().map(|r| r.path).collect();
        assert_eq!(names.len(), ROUTES.len());
        assert_eq!(paths.len(), ROUTES.len());
    }

    #[test]
    fn result_route_captures_id() {
        let m = resolve("/result/42").unwrap();
        assert_eq!(m.name(), "Result");
        assert_eq!(m.view(), View::Result);
        assert_eq!(m.param("id"), Some("42"));
    }

    #[test]
    fn static_routes_resolve() {
        assert_eq!(resolve("/").unwrap().name(), "Home");
        assert_eq!(resolve("/id-card").unwrap().view(), View::IdCard);
        assert_eq!(resolve("/advanced").unwrap().name(), "Advanced");
        assert_eq!(resolve("/advanced/watermark").unwrap().name(), "Watermark");
        assert_eq!(resolve("/advanced/translate").unwrap().name(), "Translate");
        assert!(resolve("/login").unwrap().params.is_empty());
    }

    #[test]
    fn query_fragment_and_trailing_slash_are_ignored() {
        assert_eq!(resolve("/documents/?page=2").unwrap().name(), "Documents");
        assert_eq!(resolve("/history#top").unwrap().name(), "History");
        assert_eq!(resolve("/result/7?tab=text").unwrap().param("id"), Some("7"));
    }

    #[test]
    fn unknown_or_incomplete_paths_do_not_match() {
        assert!(resolve("/result").is_none());
        assert!(resolve("/result/1/extra").is_none());
        assert!(resolve("/advanced/unknown").is_none());
        assert!(resolve("/nope").is_none());
    }

    #[test]
    fn params_are_percent_decoded() {
        let m = resolve("/result/a%20b").unwrap();
        assert_eq!(m.param("id"), Some("a b"));
    }

    #[test]
    fn href_builds_named_paths() {
        assert_eq!(href("Home", &[]).unwrap(), "/");
        assert_eq!(href("Watermark", &[]).unwrap(), "/advanced/watermark");
        assert_eq!(href("Result", &[("id", "doc 1")]).unwrap(), "/result/doc%201");
    }

    #[test]
    fn href_rejects_unknown_names_and_missing_params() {
        assert_eq!(
            href("Settings", &[]).unwrap_err(),
            RouteError::UnknownName("Settings".to_string())
        );
        assert_eq!(
            href("Result", &[]).unwrap_err(),
            RouteError::MissingParam("id".to_string())
        );
    }

    /// Records which views were loaded.
    struct RecordingLoader {
        loaded: Mutex<Vec<View>>,
    }

    impl ViewLoader for RecordingLoader {
        type Output = &'static str;

        async fn load(&self, view: View) -> &'static str {
            self.loaded.lock().unwrap().push(view);
            match view {
                View::Result => "result view",
                _ => "other view",
            }
        }
    }

    #[tokio::test]
    async fn views_load_only_on_navigation() {
        let router = Router::new(RecordingLoader {
            loaded: Mutex::new(Vec::new()),
        });
        assert_eq!(router.routes().len(), 11);
        assert!(router.loader.loaded.lock().unwrap().is_empty());

        let nav = router.navigate("/result/42").await.unwrap();
        assert_eq!(nav.view, "result view");
        assert_eq!(nav.route.param("id"), Some("42"));
        assert_eq!(*router.loader.loaded.lock().unwrap(), vec![View::Result]);
    }

    #[tokio::test]
    async fn unmatched_navigation_loads_nothing() {
        let router = Router::new(RecordingLoader {
            loaded: Mutex::new(Vec::new()),
        });
        let err = router.navigate("/missing").await.unwrap_err();
        assert_eq!(err, RouteError::NoMatch("/missing".to_string()));
        assert!(router.loader.loaded.lock().unwrap().is_empty());
    }
}
