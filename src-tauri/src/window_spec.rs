use url::Url;

use crate::{
    LOGIN_PAGE_PATH, LOGIN_WINDOW_LABEL, LOGOUT_MARKER_PARAM, OVERLAY_PAGE_PATH,
    OVERLAY_WINDOW_LABEL,
};

pub(crate) const LOGIN_WINDOW_WIDTH: f64 = 480.0;
pub(crate) const LOGIN_WINDOW_HEIGHT: f64 = 680.0;
const FALLBACK_OVERLAY_WIDTH: f64 = 1280.0;
const FALLBACK_OVERLAY_HEIGHT: f64 = 720.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum WindowKind {
    Login,
    Overlay,
}

impl WindowKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            WindowKind::Login => LOGIN_WINDOW_LABEL,
            WindowKind::Overlay => OVERLAY_WINDOW_LABEL,
        }
    }

    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            LOGIN_WINDOW_LABEL => Some(WindowKind::Login),
            OVERLAY_WINDOW_LABEL => Some(WindowKind::Overlay),
            _ => None,
        }
    }
}

/// Usable area of the primary display, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WorkArea {
    pub(crate) width: f64,
    pub(crate) height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSpec {
    pub(crate) kind: WindowKind,
    pub(crate) url: Url,
    pub(crate) title: &'static str,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) position: Option<(f64, f64)>,
    pub(crate) centered: bool,
    pub(crate) decorations: bool,
    pub(crate) transparent: bool,
    pub(crate) always_on_top: bool,
    pub(crate) resizable: bool,
    pub(crate) skip_taskbar: bool,
    pub(crate) shadow: bool,
    pub(crate) click_through: bool,
}

fn page_url(backend_url: &str, path: &str) -> Result<Url, String> {
    let base = Url::parse(backend_url)
        .map_err(|error| format!("Invalid backend URL {backend_url}: {error}"))?;
    base.join(path.trim_start_matches('/'))
        .map_err(|error| format!("Invalid page path {path}: {error}"))
}

pub(crate) fn login_window_spec(backend_url: &str, after_logout: bool) -> Result<WindowSpec, String> {
    let mut url = page_url(backend_url, LOGIN_PAGE_PATH)?;
    if after_logout {
        url.query_pairs_mut().append_pair(LOGOUT_MARKER_PARAM, "true");
    }

    Ok(WindowSpec {
        kind: WindowKind::Login,
        url,
        title: "Virtual Assistant",
        width: LOGIN_WINDOW_WIDTH,
        height: LOGIN_WINDOW_HEIGHT,
        position: None,
        centered: true,
        decorations: true,
        transparent: false,
        always_on_top: false,
        resizable: false,
        skip_taskbar: false,
        shadow: true,
        click_through: false,
    })
}

pub(crate) fn overlay_window_spec(
    backend_url: &str,
    work_area: Option<WorkArea>,
) -> Result<WindowSpec, String> {
    let url = page_url(backend_url, OVERLAY_PAGE_PATH)?;
    let (width, height) = work_area
        .filter(|area| area.width > 0.0 && area.height > 0.0)
        .map(|area| (area.width, area.height))
        .unwrap_or((FALLBACK_OVERLAY_WIDTH, FALLBACK_OVERLAY_HEIGHT));

    Ok(WindowSpec {
        kind: WindowKind::Overlay,
        url,
        title: "Virtual Assistant",
        width,
        height,
        position: Some((0.0, 0.0)),
        centered: false,
        decorations: false,
        transparent: true,
        always_on_top: true,
        resizable: false,
        skip_taskbar: true,
        shadow: false,
        click_through: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_window_spec_is_framed_centered_and_opaque() {
        let spec = login_window_spec("http://127.0.0.1:8000/", false).expect("login spec");
        assert_eq!(spec.url.as_str(), "http://127.0.0.1:8000/login");
        assert!(spec.centered);
        assert!(spec.decorations);
        assert!(!spec.transparent);
        assert!(!spec.click_through);
    }

    #[test]
    fn login_window_spec_after_logout_carries_marker() {
        let spec = login_window_spec("http://127.0.0.1:8000/", true).expect("login spec");
        assert_eq!(spec.url.as_str(), "http://127.0.0.1:8000/login?logout=true");
    }

    #[test]
    fn overlay_window_spec_covers_work_area_from_origin() {
        let spec = overlay_window_spec(
            "http://127.0.0.1:8000/",
            Some(WorkArea {
                width: 1920.0,
                height: 1040.0,
            }),
        )
        .expect("overlay spec");

        assert_eq!(spec.url.as_str(), "http://127.0.0.1:8000/main");
        assert_eq!((spec.width, spec.height), (1920.0, 1040.0));
        assert_eq!(spec.position, Some((0.0, 0.0)));
        assert!(!spec.decorations);
        assert!(spec.transparent);
        assert!(spec.always_on_top);
        assert!(!spec.resizable);
        assert!(spec.skip_taskbar);
        assert!(!spec.shadow);
        assert!(spec.click_through);
    }

    #[test]
    fn overlay_window_spec_falls_back_without_monitor() {
        let spec = overlay_window_spec("http://127.0.0.1:8000/", None).expect("overlay spec");
        assert_eq!((spec.width, spec.height), (1280.0, 720.0));
    }

    #[test]
    fn window_kind_labels_round_trip() {
        for kind in [WindowKind::Login, WindowKind::Overlay] {
            assert_eq!(WindowKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(WindowKind::from_label("main"), None);
    }
}
