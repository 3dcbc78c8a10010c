use std::collections::BTreeMap;
use std::iter::FromIterator;

/// Color of tokens without a tag or with a tag that is not in the palette.
pub const DEFAULT_COLOR: &str = "gray16";

/// Default colors of the universal part-of-speech tags.
const UNIVERSAL_COLORS: &[(&str, &str)] = &[
    ("ADJ", "dodgerblue2"),
    ("ADP", "darkgreen"),
    ("ADV", "darkgoldenrod1"),
    ("AUX", "darkolivegreen1"),
    ("CCONJ", "deeppink"),
    ("DET", "darkturquoise"),
    ("INTJ", "gold"),
    ("NOUN", "cyan4"),
    ("NUM", "burlywood"),
    ("PART", "darksalmon"),
    ("PRON", "darkviolet"),
    ("PROPN", "cornflowerblue"),
    ("PUNCT", "dimgray"),
    ("SCONJ", "chartreuse4"),
    ("SYM", "gainsboro"),
    ("VERB", "firebrick3"),
    ("X", "gray16"),
];

/// Mapping from part-of-speech tags to Graphviz color names.
///
/// The default palette colors the universal part-of-speech tags.
/// Colors of individual tags and the fallback color can be replaced:
///
/// ```
/// use tbgraph_dot::Palette;
///
/// let palette = Palette::default()
///     .with_color("NOUN", "red")
///     .with_default_color("black");
/// assert_eq!(palette.color(Some("NOUN")), "red");
/// assert_eq!(palette.color(Some("VERB")), "firebrick3");
/// assert_eq!(palette.color(Some("NN")), "black");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Palette {
    colors: BTreeMap<String, String>,
    default_color: String,
}

impl Palette {
    /// Construct a palette without tag colors.
    ///
    /// All tokens get the fallback color.
    pub fn empty() -> Self {
        Palette {
            colors: BTreeMap::new(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }

    /// Set the color of a tag.
    pub fn with_color(mut self, tag: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(tag.into(), color.into());
        self
    }

    /// Set the fallback color.
    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    /// Get the color of a tag.
    pub fn color(&self, tag: Option<&str>) -> &str {
        tag.and_then(|tag| self.colors.get(tag))
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    /// Get the fallback color.
    pub fn default_color(&self) -> &str {
        &self.default_color
    }
}

impl Default for Palette {
    fn default() -> Self {
        UNIVERSAL_COLORS.iter().copied().collect()
    }
}

impl<S, T> Extend<(S, T)> for Palette
where
    S: Into<String>,
    T: Into<String>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (S, T)>,
    {
        self.colors
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<S, T> FromIterator<(S, T)> for Palette
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
    {
        let mut palette = Palette::empty();
        palette.extend(iter);
        palette
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use super::{Palette, DEFAULT_COLOR};

    #[test]
    fn universal_colors() {
        let palette = Palette::default();
        assert_eq!(palette.color(Some("ADJ")), "dodgerblue2");
        assert_eq!(palette.color(Some("PROPN")), "cornflowerblue");
        assert_eq!(palette.color(Some("VERB")), "firebrick3");
        assert_eq!(palette.color(Some("X")), "gray16");
    }

    #[test]
    fn unknown_tags_get_default_color() {
        let palette = Palette::default();
        assert_eq!(palette.color(Some("NN")), DEFAULT_COLOR);
        assert_eq!(palette.color(None), DEFAULT_COLOR);
        assert_eq!(Palette::empty().color(Some("NOUN")), DEFAULT_COLOR);
    }

    #[test]
    fn overrides() {
        let mut palette = Palette::default().with_default_color("black");
        palette.extend(btreemap! {
            "NOUN" => "red",
            "NN" => "orange",
        });

        assert_eq!(palette.color(Some("NOUN")), "red");
        assert_eq!(palette.color(Some("NN")), "orange");
        assert_eq!(palette.color(Some("DET")), "darkturquoise");
        assert_eq!(palette.color(Some("FOO")), "black");
        assert_eq!(palette.default_color(), "black");
    }
}
