use rand::Rng;
use serde::{Deserialize, Serialize};

/// The color of a player's avatar, which also identifies the player within a game.
///
/// Either one of a few predefined names, or a hex code of six uppercase digits
/// such as `"A0FF3C"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl Color {
    pub const PREDEFINED: [&'static str; 9] = [
        "purple", "orange", "pink", "red", "blue", "green", "yellow", "white", "black",
    ];

    pub fn new(color: impl Into<String>) -> Result<Self, InvalidColor> {
        let color = color.into();
        if Self::PREDEFINED.contains(&color.as_str()) || is_hex_code(&color) {
            Ok(Self(color))
        } else {
            Err(InvalidColor(color))
        }
    }

    /// A random hex color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("{:06X}", rng.gen_range(0..=0xFF_FFFFu32)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_hex_code(s: &str) -> bool {
    s.len() == 6 && s.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

impl std::error::Error for InvalidColor {}

impl std::fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is neither a predefined color nor a hex code", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::new(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn validation() {
        assert!(Color::new("purple").is_ok());
        assert!(Color::new("0A9FFF").is_ok());
        assert_eq!(Color::new("0a9fff"), Err(InvalidColor(String::from("0a9fff"))));
        assert!(Color::new("Purple").is_err());
        assert!(Color::new("0A9FF").is_err());
        assert!(Color::new("0A9FFFF").is_err());
        assert!(Color::new("GGGGGG").is_err());
    }

    #[test]
    fn random_colors_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let color = Color::random(&mut rng);
            assert_eq!(Color::new(color.as_str()), Ok(color));
        }
    }

    #[test]
    fn deserialization_validates() {
        let color: Color = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(color.as_str(), "red");
        assert!(serde_json::from_str::<Color>("\"magenta\"").is_err());
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"red\"");
    }
}
