//! Request URL construction.

use crate::addressing::{base_coord, TileId};

/// Builds request URLs from a template.
///
/// Recognised placeholders:
///
/// | Placeholder | Value                                   |
/// |-------------|-----------------------------------------|
/// | `{layers}`  | configured layer name                   |
/// | `{styles}`  | configured style name (may be empty)    |
/// | `{level}`   | quadtree level                          |
/// | `{patch}`   | patch index within the level            |
/// | `{base}`    | root patch the tile descends from       |
/// | `{x}`/`{y}` | position of the tile inside its root    |
///
/// # Example
///
/// ```
/// use tilestream::addressing::TileId;
/// use tilestream::remote::UrlTemplate;
///
/// let template = UrlTemplate::new("https://wms.test/{layers}/{level}/{base}/{x}/{y}", "dem", "");
/// assert_eq!(template.url(TileId::new(1, 23)), "https://wms.test/dem/1/5/1/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
    layers: String,
    styles: String,
}

impl UrlTemplate {
    /// Create a template for one layer.
    pub fn new(template: impl Into<String>, layers: impl Into<String>, styles: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            layers: layers.into(),
            styles: styles.into(),
        }
    }

    /// Layer name used in URLs and cache paths.
    pub fn layers(&self) -> &str {
        &self.layers
    }

    /// The unexpanded template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// URL for `tile`.
    pub fn url(&self, tile: TileId) -> String {
        let coord = base_coord(tile);
        self.template
            .replace("{layers}", &self.layers)
            .replace("{styles}", &self.styles)
            .replace("{level}", &tile.level().to_string())
            .replace("{patch}", &tile.patch_idx().to_string())
            .replace("{base}", &coord.base.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_placeholders() {
        let template = UrlTemplate::new(
            "http://h/wms?layers={layers}&styles={styles}&l={level}&p={patch}&b={base}&x={x}&y={y}",
            "mola",
            "shade",
        );
        // Level 2, base 3, local index 6 -> x = 2, y = 1.
        let url = template.url(TileId::new(2, 3 * 16 + 6));
        assert_eq!(
            url,
            "http://h/wms?layers=mola&styles=shade&l=2&p=54&b=3&x=2&y=1"
        );
    }

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        let template = UrlTemplate::new("http://h/static.png", "a", "");
        assert_eq!(template.url(TileId::root(0)), "http://h/static.png");
        assert_eq!(template.layers(), "a");
    }
}
