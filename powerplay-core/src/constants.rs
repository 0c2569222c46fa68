//! Centralized classification thresholds and lookup tables for PowerPlay tracking.
//!
//! These values are hand-tuned against real journal traffic. Keeping them together
//! means the heuristics can only be adjusted through reviewed code changes, never
//! through user configuration.

// History window ----------------------------------------------------------
/// Number of accepted journal events retained for windowed classification.
pub const HISTORY_DEPTH: usize = 20;
/// Events to wait after a batch cartography sale before summing its merits.
pub const BATCH_CARTOGRAPHY_DEFERRAL: u8 = 5;

// Classifier thresholds ---------------------------------------------------
pub(crate) const SHIP_SCAN_MAX_MERITS: i64 = 40;
pub(crate) const SHIP_SCAN_MIN_STAGE: i64 = 2;
pub(crate) const HIGH_VALUE_SALE_RATIO: f64 = 1.4;
pub(crate) const LOW_VALUE_SALE_MAX_PRICE: i64 = 500;
pub(crate) const DATALINK_SCAN_TYPE: &str = "$Datascan_ShipUplink;";
pub(crate) const DONATION_MISSION_PATTERN: &str = r"^Mission_Altruism.*$";

// Commodity filters -------------------------------------------------------
pub(crate) const EXCLUDED_COLLECT_TYPE: &str = "powerspyware";
pub(crate) const POWER_MICRO_RESOURCE_PREFIX: &str = "power";

// Rank brackets -----------------------------------------------------------
pub(crate) const RANK_THRESHOLDS: [u64; 5] = [2_000, 5_000, 9_000, 15_000, 23_000];
pub(crate) const RANK_DELTAS: [u64; 4] = [2_000, 3_000, 4_000, 6_000];
pub(crate) const RANK_STEP_MERITS: u64 = 8_000;

/// Event names with no merit significance; never retained in the history window.
pub(crate) const NOISE_EVENTS: &[&str] = &[
    "friends",
    "receivetext",
    "powerplay",
    "powerplaycollect",
    "powerplayrank",
    "reservoirreplenished",
    "sendtext",
    "communitygoal",
    "wingadd",
    "wingjoin",
    "winginvite",
    "wingleave",
    "wingremove",
    "wingcancel",
    "startup",
    "loadout",
    "shiplocker",
    "statistics",
    "music",
    "carrierlocation",
    "hulldamage",
    "repairall",
    "repair",
    "missionaccepted",
    "refuelall",
    "fssdiscoveryscan",
    "fsssignaldiscovered",
    "navroute",
    "dockingrequested",
    "dockinggranted",
    "storedships",
    "shipyard",
    "crimevictim",
];

/// Salvage item names handed in through search-and-rescue contacts.
pub(crate) const SALVAGE_TYPES: &[&str] = &[
    "occupiedcryopod",
    "damagedescapepod",
    "wreckagecomponents",
    "usscargoblackbox",
];

/// Encoded materials dropped by scanning high-energy wakes.
pub(crate) const WAKE_SCAN_MATERIALS: &[&str] = &[
    "disruptedwakeechoes",
    "wakesolutions",
    "fsdtelemetry",
    "hyperspacetrajectories",
    "dataminedwake",
];

/// Internal commodity names of every rare good.
pub(crate) const RARE_GOODS: &[&str] = &[
    "saxonwine",
    "rusanioldsmokey",
    "thrutiscream",
    "uzumokulowgwings",
    "damnacarapaces",
    "bastsnakegin",
    "terramaterbloodbores",
    "livehecateseaworms",
    "gerasiangueuzebeer",
    "chameleoncloth",
    "onionheadalphastrain",
    "wolffesh",
    "hipprotosquid",
    "momusbogspaniel",
    "taurichimes",
    "fujintea",
    "ethgrezeteabuds",
    "esusekucaviar",
    "zeesszeantgrubglue",
    "azcancriformula42",
    "witchhaulkobebeef",
    "eraninpearlwhisky",
    "pantaaprayersticks",
    "konggaale",
    "tiegfriessynthsilk",
    "voidextractcoffee",
    "vherculisbodyrub",
    "vegaslimweed",
    "honestypills",
    "haidenblackbrew",
    "nanomedicines",
    "bankiamphibiousleather",
    "chateaudeaegaeon",
    "aganipperush",
    "thehuttonmug",
    "centaurimegagin",
    "altairianskin",
    "cherbonesbloodcrystals",
    "jotunmookah",
    "gilyasignatureweapons",
    "indibourbon",
    "havasupaidreamcatcher",
    "buckyballbeermats",
    "hip10175bushmeat",
    "ochoengchillies",
    "ophiuchexinoartefacts",
    "mechucoshightea",
    "pavoniseargrubs",
    "crystallinespheres",
    "lyraeweed",
    "hiporganophosphates",
    "borasetanipathogenetics",
    "volkhabbeedrones",
    "wulpahyperboresystems",
    "motronaexperiencejelly",
    "lucanonionhead",
    "tanmarktranquiltea",
    "onionhead",
    "tarachspice",
    "masterchefs",
    "xihebiomorphiccompanions",
    "mulachigiantfungus",
    "tiolcewaste2pasteunits",
    "neritusberries",
    "chieridanimarinepaste",
    "ltthypersweet",
    "medbstarlube",
    "alyabodysoap",
    "galactictravelguide",
    "cromsilverfesh",
    "duradrives",
    "alacarakmoskinart",
    "rajukrumultistoves",
    "cetirabbits",
    "aepyornisegg",
    "ngunamodernantiques",
    "mokojingbeastfeast",
    "thewatersofshintara",
    "ultracompactprocessorprototypes",
    "kachiriginfilterleeches",
    "utgaroarmillennialeggs",
    "helvetitjpearls",
    "ceremonialheiketea",
    "vidavantianlace",
    "bakedgreebles",
    "harmasilversearum",
    "noneuclidianexotanks",
    "jaradharrepuzzlebox",
    "coquimspongiformvictuals",
    "onionheadbetastrain",
    "albinoquechuamammothmeat",
    "karetiicouture",
    "platinumalloy",
    "korokungpellets",
    "aroucaconventualsweets",
    "kamorinhistoricweapons",
    "belalansrayleather",
    "mukusubiichitinos",
    "cd75kittenbrandcoffee",
    "shanscharisorchid",
    "vanayequiceratomorphafur",
    "eleuthermals",
    "apavietii",
    "deuringastruffles",
    "hip118311swarm",
    "giantverrix",
    "azuremilk",
    "leestianeviljuice",
    "disomacorn",
    "uszaiantreegrub",
    "baltahsinevacuumkrill",
    "lavianbrandy",
    "orrerianviciousbrew",
    "leatheryeggs",
    "anynacoffee",
    "deltaphoenicispalms",
    "personalgifts",
    "edenapplesofaerial",
    "hr7221wheat",
    "yasokondileaf",
    "holvaduellingblades",
    "anduligafireworks",
    "burnhambiledistillate",
    "kinagoviolins",
    "ngadandarifireopals",
    "rapabaosnakeskins",
    "toxandjivirocide",
    "kamitracigars",
    "wuthielokufroth",
    "sanumadecorativemeat",
    "geawendancedust",
    "jarouarice",
    "giantirukamasnails",
    "classifiedexperimentalequipment",
    "njangarisaddles",
    "soontillrelics",
    "gomanyauponcoffee",
    "karsukilocusts",
    "eshuumbrellas",
    "wheemetewheatcakes",
    "jaquesquinentianstill",
    "tianveganmeat",
    "sothiscrystallinegold",
    "sothiscrystallinesilver",
    "sothiscrystallinelithium",
];

/// Case-insensitive membership test against the rare goods table.
#[must_use]
pub fn is_rare_commodity(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    RARE_GOODS.contains(&lowered.as_str())
}

pub(crate) fn is_noise_event(name_lower: &str) -> bool {
    NOISE_EVENTS.contains(&name_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rare_lookup_ignores_case() {
        assert!(is_rare_commodity("LavianBrandy"));
        assert!(is_rare_commodity("onionhead"));
        assert!(!is_rare_commodity("gold"));
        assert!(!is_rare_commodity(""));
    }

    #[test]
    fn noise_table_is_lowercase() {
        assert!(NOISE_EVENTS.iter().all(|name| *name == name.to_ascii_lowercase()));
        assert!(is_noise_event("dockinggranted"));
        assert!(!is_noise_event("powerplaymerits"));
        assert!(!is_noise_event("docked"));
    }
}
