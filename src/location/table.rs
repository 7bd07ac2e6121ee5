//! Static province → coordinate table.
//!
//! Loaded once at startup and never mutated. Lookups are case-insensitive
//! exact matches on the canonical name or one of its aliases.

use super::types::Coordinate;
use serde::Serialize;
use std::collections::HashMap;

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinProvince {
    names: &'static [&'static str], // canonical + aliases
    lat: f64,
    lon: f64,
}

/// Thai provinces, positioned at the provincial seat.
const THAI_PROVINCES: &[BuiltinProvince] = &[
    BuiltinProvince { names: &["Bangkok", "Krung Thep", "Krung Thep Maha Nakhon"], lat: 13.75, lon: 100.5 },
    BuiltinProvince { names: &["Amnat Charoen"], lat: 15.8657, lon: 104.6258 },
    BuiltinProvince { names: &["Ang Thong"], lat: 14.5896, lon: 100.4550 },
    BuiltinProvince { names: &["Bueng Kan"], lat: 18.3609, lon: 103.6466 },
    BuiltinProvince { names: &["Buriram", "Buri Ram"], lat: 14.9930, lon: 103.1029 },
    BuiltinProvince { names: &["Chachoengsao"], lat: 13.6904, lon: 101.0780 },
    BuiltinProvince { names: &["Chai Nat"], lat: 15.1852, lon: 100.1251 },
    BuiltinProvince { names: &["Chaiyaphum"], lat: 15.8068, lon: 102.0317 },
    BuiltinProvince { names: &["Chanthaburi"], lat: 12.6113, lon: 102.1039 },
    BuiltinProvince { names: &["Chiang Mai"], lat: 18.7883, lon: 98.9853 },
    BuiltinProvince { names: &["Chiang Rai"], lat: 19.9105, lon: 99.8406 },
    BuiltinProvince { names: &["Chonburi", "Chon Buri"], lat: 13.3611, lon: 100.9847 },
    BuiltinProvince { names: &["Chumphon"], lat: 10.4930, lon: 99.1800 },
    BuiltinProvince { names: &["Kalasin"], lat: 16.4322, lon: 103.5061 },
    BuiltinProvince { names: &["Kamphaeng Phet"], lat: 16.4828, lon: 99.5227 },
    BuiltinProvince { names: &["Kanchanaburi"], lat: 14.0228, lon: 99.5328 },
    BuiltinProvince { names: &["Khon Kaen"], lat: 16.4419, lon: 102.8360 },
    BuiltinProvince { names: &["Krabi"], lat: 8.0863, lon: 98.9063 },
    BuiltinProvince { names: &["Lampang"], lat: 18.2888, lon: 99.4909 },
    BuiltinProvince { names: &["Lamphun"], lat: 18.5745, lon: 99.0087 },
    BuiltinProvince { names: &["Loei"], lat: 17.4860, lon: 101.7223 },
    BuiltinProvince { names: &["Lopburi", "Lop Buri"], lat: 14.7995, lon: 100.6534 },
    BuiltinProvince { names: &["Mae Hong Son"], lat: 19.3020, lon: 97.9654 },
    BuiltinProvince { names: &["Maha Sarakham"], lat: 16.1851, lon: 103.3029 },
    BuiltinProvince { names: &["Mukdahan"], lat: 16.5453, lon: 104.7235 },
    BuiltinProvince { names: &["Nakhon Nayok"], lat: 14.2069, lon: 101.2131 },
    BuiltinProvince { names: &["Nakhon Pathom"], lat: 13.8199, lon: 100.0621 },
    BuiltinProvince { names: &["Nakhon Phanom"], lat: 17.3920, lon: 104.7695 },
    BuiltinProvince { names: &["Nakhon Ratchasima", "Korat"], lat: 14.9799, lon: 102.0978 },
    BuiltinProvince { names: &["Nakhon Sawan"], lat: 15.7047, lon: 100.1372 },
    BuiltinProvince { names: &["Nakhon Si Thammarat"], lat: 8.4304, lon: 99.9631 },
    BuiltinProvince { names: &["Nan"], lat: 18.7756, lon: 100.7730 },
    BuiltinProvince { names: &["Narathiwat"], lat: 6.4255, lon: 101.8253 },
    BuiltinProvince { names: &["Nong Bua Lamphu"], lat: 17.2218, lon: 102.4260 },
    BuiltinProvince { names: &["Nong Khai"], lat: 17.8783, lon: 102.7420 },
    BuiltinProvince { names: &["Nonthaburi"], lat: 13.8621, lon: 100.5144 },
    BuiltinProvince { names: &["Pathum Thani"], lat: 14.0208, lon: 100.5250 },
    BuiltinProvince { names: &["Pattani"], lat: 6.8695, lon: 101.2501 },
    BuiltinProvince { names: &["Phang Nga", "Phangnga"], lat: 8.4501, lon: 98.5255 },
    BuiltinProvince { names: &["Phatthalung"], lat: 7.6167, lon: 100.0740 },
    BuiltinProvince { names: &["Phayao"], lat: 19.1666, lon: 99.9019 },
    BuiltinProvince { names: &["Phetchabun"], lat: 16.4190, lon: 101.1606 },
    BuiltinProvince { names: &["Phetchaburi"], lat: 13.1119, lon: 99.9398 },
    BuiltinProvince { names: &["Phichit"], lat: 16.4429, lon: 100.3488 },
    BuiltinProvince { names: &["Phitsanulok"], lat: 16.8211, lon: 100.2659 },
    BuiltinProvince { names: &["Phra Nakhon Si Ayutthaya", "Ayutthaya"], lat: 14.3692, lon: 100.5877 },
    BuiltinProvince { names: &["Phrae"], lat: 18.1446, lon: 100.1403 },
    BuiltinProvince { names: &["Phuket"], lat: 7.8804, lon: 98.3923 },
    BuiltinProvince { names: &["Prachinburi", "Prachin Buri"], lat: 14.0509, lon: 101.3717 },
    BuiltinProvince { names: &["Prachuap Khiri Khan"], lat: 11.8124, lon: 99.7973 },
    BuiltinProvince { names: &["Ranong"], lat: 9.9529, lon: 98.6085 },
    BuiltinProvince { names: &["Ratchaburi"], lat: 13.5283, lon: 99.8134 },
    BuiltinProvince { names: &["Rayong"], lat: 12.6814, lon: 101.2816 },
    BuiltinProvince { names: &["Roi Et"], lat: 16.0538, lon: 103.6520 },
    BuiltinProvince { names: &["Sa Kaeo"], lat: 13.8240, lon: 102.0646 },
    BuiltinProvince { names: &["Sakon Nakhon"], lat: 17.1546, lon: 104.1348 },
    BuiltinProvince { names: &["Samut Prakan"], lat: 13.5991, lon: 100.5998 },
    BuiltinProvince { names: &["Samut Sakhon"], lat: 13.5475, lon: 100.2744 },
    BuiltinProvince { names: &["Samut Songkhram"], lat: 13.4098, lon: 100.0023 },
    BuiltinProvince { names: &["Saraburi"], lat: 14.5289, lon: 100.9101 },
    BuiltinProvince { names: &["Satun"], lat: 6.6238, lon: 100.0674 },
    BuiltinProvince { names: &["Sing Buri"], lat: 14.8936, lon: 100.3967 },
    BuiltinProvince { names: &["Sisaket", "Si Sa Ket"], lat: 15.1186, lon: 104.3220 },
    BuiltinProvince { names: &["Songkhla"], lat: 7.1898, lon: 100.5954 },
    BuiltinProvince { names: &["Sukhothai"], lat: 17.0056, lon: 99.8264 },
    BuiltinProvince { names: &["Suphan Buri"], lat: 14.4745, lon: 100.1177 },
    BuiltinProvince { names: &["Surat Thani"], lat: 9.1382, lon: 99.3217 },
    BuiltinProvince { names: &["Surin"], lat: 14.8818, lon: 103.4936 },
    BuiltinProvince { names: &["Tak"], lat: 16.8840, lon: 99.1258 },
    BuiltinProvince { names: &["Trang"], lat: 7.5645, lon: 99.6239 },
    BuiltinProvince { names: &["Trat"], lat: 12.2428, lon: 102.5175 },
    BuiltinProvince { names: &["Ubon Ratchathani"], lat: 15.2287, lon: 104.8564 },
    BuiltinProvince { names: &["Udon Thani"], lat: 17.4138, lon: 102.7872 },
    BuiltinProvince { names: &["Uthai Thani"], lat: 15.3835, lon: 100.0246 },
    BuiltinProvince { names: &["Uttaradit"], lat: 17.6201, lon: 100.0993 },
    BuiltinProvince { names: &["Yala"], lat: 6.5411, lon: 101.2804 },
    BuiltinProvince { names: &["Yasothon"], lat: 15.7926, lon: 104.1453 },
];

/// A province entry for the public province list API.
#[derive(Debug, Clone, Serialize)]
pub struct ProvinceInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Immutable province table with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationTable {
    /// Lowercased name or alias → index into `provinces`.
    index: HashMap<String, usize>,
    provinces: Vec<(String, Coordinate)>,
}

impl StaticLocationTable {
    /// The built-in Thai province table.
    pub fn thailand() -> Self {
        let mut table = Self::default();
        for p in THAI_PROVINCES {
            // Built-in values are in range; skip rather than panic if one is not.
            let Ok(coord) = Coordinate::new(p.lat, p.lon) else {
                tracing::warn!(province = p.names[0], "skipping built-in province with invalid coordinates");
                continue;
            };
            table.insert_with_aliases(p.names[0], &p.names[1..], coord);
        }
        table
    }

    /// Build a table from `(canonical name, coordinate)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, coord) in entries {
            let name = name.into();
            table.insert_with_aliases(&name, &[], coord);
        }
        table
    }

    fn insert_with_aliases(&mut self, canonical: &str, aliases: &[&str], coord: Coordinate) {
        let idx = self.provinces.len();
        self.provinces.push((canonical.to_string(), coord));
        self.index.insert(canonical.to_lowercase(), idx);
        for alias in aliases {
            self.index.insert(alias.to_lowercase(), idx);
        }
    }

    /// Case-insensitive exact match on a canonical name or alias.
    pub fn lookup(&self, name: &str) -> Option<Coordinate> {
        self.lookup_entry(name).map(|(_, c)| c)
    }

    /// Like [`lookup`](Self::lookup) but also returns the canonical name.
    pub fn lookup_entry(&self, name: &str) -> Option<(&str, Coordinate)> {
        let idx = *self.index.get(&name.trim().to_lowercase())?;
        self.provinces.get(idx).map(|(n, c)| (n.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    /// All canonical entries, sorted by name (for the list API).
    pub fn provinces(&self) -> Vec<ProvinceInfo> {
        let mut list: Vec<ProvinceInfo> = self
            .provinces
            .iter()
            .map(|(name, c)| ProvinceInfo {
                name: name.clone(),
                lat: c.lat(),
                lon: c.lon(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }
}
