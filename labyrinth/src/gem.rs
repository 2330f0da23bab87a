use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};

/// A gem that can be pictured on a tile.
///
/// Serialized as its kebab-case name, e.g. `"alexandrite-pear-shape"`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
)]
#[serde(rename_all = "kebab-case")]
pub enum Gem {
    AlexandritePearShape,
    Alexandrite,
    AlmandineGarnet,
    Amethyst,
    Ametrine,
    Ammolite,
    Apatite,
    Aplite,
    ApricotSquareRadiant,
    Aquamarine,
    AustralianMarquise,
    Aventurine,
    Azurite,
    Beryl,
    BlackObsidian,
    BlackOnyx,
    BlackSpinelCushion,
    BlueCeylonSapphire,
    BlueCushion,
    BluePearShape,
    BlueSpinelHeart,
    BullsEye,
    Carnelian,
    ChromeDiopside,
    ChrysoberylCushion,
    Chrysolite,
    CitrineCheckerboard,
    Citrine,
    Clinohumite,
    ColorChangeOval,
    Cordierite,
    Diamond,
    Dumortierite,
    Emerald,
    FancySpinelMarquise,
    Garnet,
    GoldenDiamondCut,
    Goldstone,
    Grandidierite,
    GrayAgate,
    GreenAventurine,
    GreenBerylAntique,
    GreenBeryl,
    GreenPrincessCut,
    GrossularGarnet,
    Hackmanite,
    Heliotrope,
    Hematite,
    IoliteEmeraldCut,
    Jasper,
    Jaspilite,
    KunziteOval,
    Kunzite,
    Labradorite,
    LapisLazuli,
    LemonQuartzBriolette,
    Magnesite,
    MexicanOpal,
    Moonstone,
    MorganiteOval,
    MossAgate,
    OrangeRadiant,
    PadparadschaOval,
    PadparadschaSapphire,
    Peridot,
    PinkEmeraldCut,
    PinkOpal,
    PinkRound,
    PinkSpinelCushion,
    Prasiolite,
    Prehnite,
    PurpleCabochon,
    PurpleOval,
    PurpleSpinelTrillion,
    PurpleSquareCushion,
    RawBeryl,
    RawCitrine,
    RedDiamond,
    RedSpinelSquareEmeraldCut,
    Rhodonite,
    RockQuartz,
    RoseQuartz,
    RubyDiamondProfile,
    Ruby,
    Sphalerite,
    Spinel,
    StarCabochon,
    Stilbite,
    Sunstone,
    SuperSeven,
    TanzaniteTrillion,
    TigersEye,
    TourmalineLaserCut,
    Tourmaline,
    Unakite,
    WhiteSquare,
    YellowBaguette,
    YellowBerylOval,
    YellowHeart,
    YellowJasper,
    Zircon,
    Zoisite,
}

/// The treasure of a tile: an unordered pair of gems.
///
/// The pair is stored in sorted order, so `GemPair::new(a, b) == GemPair::new(b, a)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GemPair {
    gems: (Gem, Gem),
}

impl GemPair {
    pub fn new(first: Gem, second: Gem) -> Self {
        let gems = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self { gems }
    }

    pub fn gems(&self) -> (Gem, Gem) {
        self.gems
    }

    /// Every distinct unordered pair of gems, including pairs of the same gem twice.
    pub fn all() -> impl Iterator<Item = GemPair> {
        use strum::IntoEnumIterator;
        Gem::iter().flat_map(|first| {
            Gem::iter()
                .filter(move |&second| first <= second)
                .map(move |second| GemPair::new(first, second))
        })
    }
}

impl std::fmt::Display for Gem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The serialized name is the canonical display name.
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => write!(f, "{}", name),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl std::fmt::Display for GemPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.gems.0, self.gems.1)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn gem_pair_ignores_order(a: Gem, b: Gem) -> bool {
            GemPair::new(a, b) == GemPair::new(b, a)
        }
    }

    #[test]
    fn catalogue() {
        assert_eq!(Gem::COUNT, 101);
        assert_eq!(GemPair::all().count(), 101 * 102 / 2);
        assert_eq!(
            serde_json::to_string(&Gem::AlexandritePearShape).unwrap(),
            "\"alexandrite-pear-shape\""
        );
        assert_eq!(
            serde_json::from_str::<Gem>("\"red-spinel-square-emerald-cut\"").unwrap(),
            Gem::RedSpinelSquareEmeraldCut
        );
        assert_eq!(Gem::TigersEye.to_string(), "tigers-eye");
    }
}
