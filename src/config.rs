use eframe::egui::{self, Color32};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/datasets/";
pub const DEFAULT_HISTOGRAM_BINS: usize = 12;

// ---------------------------------------------------------------------------
// Theme – colours handed to the rendering layer
// ---------------------------------------------------------------------------

/// Dashboard colours. Passed explicitly to every render function.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub bg: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub header: Color32,
    pub border: Color32,
    pub axis_text: Color32,
    pub button_bg: Color32,
    pub button_text: Color32,
    /// One fill per KPI card, left to right.
    pub kpi_fills: [Color32; 4],
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            bg: Color32::from_rgb(0x16, 0x1f, 0x2a),
            panel: Color32::from_rgb(0x22, 0x2e, 0x3c),
            text: Color32::from_rgb(0xe6, 0xea, 0xf1),
            header: Color32::from_rgb(0x3f, 0xc1, 0xc9),
            border: Color32::from_rgb(0x3f, 0xc1, 0xc9),
            axis_text: Color32::from_rgb(0xbd, 0xd8, 0xed),
            button_bg: Color32::from_rgb(0x21, 0x2d, 0x43),
            button_text: Color32::from_rgb(0x3f, 0xc1, 0xc9),
            kpi_fills: [
                Color32::from_rgb(0x17, 0x4d, 0x56),
                Color32::from_rgb(0x35, 0x23, 0x22),
                Color32::from_rgb(0x1b, 0x5b, 0x53),
                Color32::from_rgb(0x32, 0x1e, 0x40),
            ],
        }
    }

    /// egui visuals derived from this theme.
    pub fn visuals(&self) -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.bg;
        visuals.window_fill = self.panel;
        visuals.extreme_bg_color = self.panel;
        visuals.faint_bg_color = self.panel;
        visuals.override_text_color = Some(self.text);
        visuals.widgets.inactive.weak_bg_fill = self.button_bg;
        visuals.widgets.hovered.weak_bg_fill = self.border;
        visuals
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Runtime configuration: built-in defaults overridden by environment.
///
/// * `DASHBOARD_API_URL` – upload endpoint
/// * `DASHBOARD_UPLOAD=0` – do not upload loaded files
/// * `DASHBOARD_HISTOGRAM_BINS` – bucket count of the flowrate histogram
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` disables uploading.
    pub upload_endpoint: Option<String>,
    pub histogram_bins: usize,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: Some(DEFAULT_API_URL.to_string()),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            theme: Theme::dark(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(url) = lookup("DASHBOARD_API_URL").filter(|u| !u.trim().is_empty()) {
            cfg.upload_endpoint = Some(url.trim().to_string());
        }
        if lookup("DASHBOARD_UPLOAD").as_deref().map(str::trim) == Some("0") {
            cfg.upload_endpoint = None;
        }
        if let Some(raw) = lookup("DASHBOARD_HISTOGRAM_BINS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => cfg.histogram_bins = n,
                _ => log::warn!(
                    "ignoring DASHBOARD_HISTOGRAM_BINS={raw:?}, using {DEFAULT_HISTOGRAM_BINS}"
                ),
            }
        }

        cfg
    }
}
