use serde::{Deserialize, Serialize};

/// Where maps are centred when there is nothing to show.
pub const DEFAULT_CENTER: (f64, f64) = (48.8566, 2.3522);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    #[default]
    Positron,
    DarkMatter,
    OpenStreetMap,
    StamenTerrain,
    StamenToner,
}

impl MapStyle {
    pub const ALL: [MapStyle; 5] = [
        MapStyle::Positron,
        MapStyle::DarkMatter,
        MapStyle::OpenStreetMap,
        MapStyle::StamenTerrain,
        MapStyle::StamenToner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MapStyle::Positron => "Light (Positron)",
            MapStyle::DarkMatter => "Dark (Dark Matter)",
            MapStyle::OpenStreetMap => "Streets (OpenStreetMap)",
            MapStyle::StamenTerrain => "Terrain",
            MapStyle::StamenToner => "Minimal",
        }
    }

    pub fn tile_url(&self) -> &'static str {
        match self {
            MapStyle::Positron => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            MapStyle::DarkMatter => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            MapStyle::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            MapStyle::StamenTerrain => "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}{r}.png",
            MapStyle::StamenToner => "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}{r}.png",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            MapStyle::Positron | MapStyle::DarkMatter => {
                "&copy; OpenStreetMap contributors &copy; CARTO"
            }
            MapStyle::OpenStreetMap => "&copy; OpenStreetMap contributors",
            MapStyle::StamenTerrain | MapStyle::StamenToner => {
                "&copy; Stamen Design &copy; OSM contributors"
            }
        }
    }
}

/// Dashboard settings, editable at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub map_style: MapStyle,
    pub animation_speed_ms: u32,
    pub segment_animation_speed_ms: u32,
    pub show_markers: bool,
    pub point_density: u32,
    pub cache_ttl_secs: u64,
    pub max_workers: usize,
    pub line_thickness: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            map_style: MapStyle::default(),
            animation_speed_ms: 100,
            segment_animation_speed_ms: 100,
            show_markers: true,
            point_density: 3,
            cache_ttl_secs: 3600,
            max_workers: 4,
            line_thickness: 3,
        }
    }
}

impl Settings {
    /// Forces every field into the range the dashboard offers.
    pub fn clamped(mut self) -> Self {
        self.animation_speed_ms = self.animation_speed_ms.clamp(50, 500);
        self.segment_animation_speed_ms = self.segment_animation_speed_ms.clamp(10, 500);
        self.point_density = self.point_density.clamp(1, 10);
        self.cache_ttl_secs = self.cache_ttl_secs.clamp(60, 86_400);
        self.max_workers = self.max_workers.clamp(1, 16);
        self.line_thickness = self.line_thickness.clamp(1, 10);
        self
    }
}
