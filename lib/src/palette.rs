use crate::cmyk::Cmyk;
use crate::color::{self, Rgb};
use crate::error::{Error, Result};
use crate::mixer::{self, MixResult, SolverConfig};
use serde::{Deserialize, Serialize};

/// Ordered inks, the index of an ink is its slot in ratio results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    inks: Vec<Cmyk>,
}

impl Palette {
    pub fn new(inks: Vec<Cmyk>) -> Self {
        Palette { inks }
    }

    pub fn from_hex(hexes: &[&str]) -> Result<Self> {
        let inks = hexes
            .iter()
            .map(|hex| color::hex_to_cmyk(hex))
            .collect::<Result<Vec<_>>>()?;

        Ok(Palette::new(inks))
    }

    pub fn len(&self) -> usize {
        self.inks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inks.is_empty()
    }

    pub fn push(&mut self, ink: Cmyk) {
        self.inks.push(ink);
    }

    pub fn pop(&mut self) -> Option<Cmyk> {
        self.inks.pop()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.inks.len() {
            return Err(Error::InkIndex {
                index,
                len: self.inks.len(),
            });
        }

        Ok(())
    }

    pub fn set(&mut self, index: usize, ink: Cmyk) -> Result<()> {
        self.check_index(index)?;
        self.inks[index] = ink;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Cmyk> {
        self.check_index(index)?;
        Ok(self.inks.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cmyk> {
        self.inks.iter()
    }

    pub fn as_slice(&self) -> &[Cmyk] {
        &self.inks
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.inks.iter().copied().map(color::cmyk_to_hex).collect()
    }
}

impl From<Vec<Cmyk>> for Palette {
    fn from(inks: Vec<Cmyk>) -> Self {
        Palette::new(inks)
    }
}

/// State a front end keeps between interactions: the color picked by the
/// user, the inks to mix and an optional explicit target.
#[derive(Clone, Debug)]
pub struct Session {
    selected: Option<Rgb>,
    palette: Palette,
    target: Option<Cmyk>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            selected: None,
            palette: Palette::new(vec![Cmyk::CYAN]),
            target: None,
        }
    }

    pub fn selected(&self) -> Option<Rgb> {
        self.selected
    }

    pub fn select_rgb(&mut self, rgb: Rgb) {
        self.selected = Some(rgb);
    }

    /// Leaves the selection untouched if `hex` does not parse.
    pub fn select_hex(&mut self, hex: &str) -> Result<Rgb> {
        let rgb = color::hex_to_rgb(hex).ok_or_else(|| Error::InvalidHex(hex.to_string()))?;
        self.selected = Some(rgb);
        Ok(rgb)
    }

    pub fn set_target(&mut self, target: Cmyk) {
        self.target = Some(target);
    }

    pub fn set_target_hex(&mut self, hex: &str) -> Result<Cmyk> {
        let target = color::hex_to_cmyk(hex)?;
        self.target = Some(target);
        Ok(target)
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// The explicit target, else the selected color, else cyan.
    pub fn target(&self) -> Cmyk {
        self.target
            .or_else(|| self.selected.map(Rgb::to_cmyk))
            .unwrap_or(Cmyk::CYAN)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Appends an ink without coverage.
    pub fn add_ink(&mut self) {
        self.palette.push(Cmyk::WHITE);
    }

    pub fn remove_last_ink(&mut self) -> Option<Cmyk> {
        self.palette.pop()
    }

    pub fn mix(&self, config: &SolverConfig) -> Result<MixResult> {
        mixer::calculate_ratios(self.palette.as_slice(), self.target(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_from_hex() {
        let palette = Palette::from_hex(&["#00ffff", "FF00FF"]).unwrap();
        assert_eq!(palette.as_slice(), &[Cmyk::CYAN, Cmyk::MAGENTA]);
        assert_eq!(palette.to_hex(), vec!["#00ffff", "#ff00ff"]);
        assert!(Palette::from_hex(&["#00ffff", "bogus"]).is_err());
    }

    #[test]
    fn palette_editing() {
        let mut palette = Palette::new(vec![Cmyk::CYAN, Cmyk::MAGENTA]);
        palette.set(1, Cmyk::YELLOW).unwrap();
        assert_eq!(palette.as_slice(), &[Cmyk::CYAN, Cmyk::YELLOW]);

        assert!(matches!(
            palette.set(2, Cmyk::KEY),
            Err(Error::InkIndex { index: 2, len: 2 })
        ));

        assert_eq!(palette.remove(0).unwrap(), Cmyk::CYAN);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.pop(), Some(Cmyk::YELLOW));
        assert_eq!(palette.pop(), None);
        assert!(palette.is_empty());
    }

    #[test]
    fn palette_serializes_as_list() {
        let palette = Palette::new(vec![Cmyk::KEY]);
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, r#"[{"c":0.0,"m":0.0,"y":0.0,"k":1.0}]"#);
    }

    #[test]
    fn session_target_precedence() {
        let mut session = Session::new();
        assert_eq!(session.target(), Cmyk::CYAN);

        session.select_rgb(Rgb::new(0, 0, 0));
        assert_eq!(session.target(), Cmyk::KEY);

        session.set_target(Cmyk::YELLOW);
        assert_eq!(session.target(), Cmyk::YELLOW);

        session.clear_target();
        assert_eq!(session.target(), Cmyk::KEY);
    }

    #[test]
    fn invalid_selection_keeps_previous() {
        let mut session = Session::new();
        session.select_hex("#ff00ff").unwrap();
        assert!(session.select_hex("#ff00f").is_err());
        assert_eq!(session.selected(), Some(Rgb::new(255, 0, 255)));
    }

    #[test]
    fn session_mixes_current_palette() {
        let mut session = Session::new();
        session.palette_mut().push(Cmyk::MAGENTA);
        session.set_target_hex("#8080ff").unwrap();

        let result = session.mix(&SolverConfig::default()).unwrap();
        assert_eq!(result.ratios.len(), 2);

        session.add_ink();
        assert_eq!(session.palette().len(), 3);
        assert_eq!(session.mix(&SolverConfig::default()).unwrap().ratios.len(), 3);

        session.remove_last_ink();
        session.remove_last_ink();
        session.remove_last_ink();
        assert!(matches!(
            session.mix(&SolverConfig::default()),
            Err(Error::EmptyPalette)
        ));
    }
}
