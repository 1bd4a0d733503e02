//! Coordinate Reference System handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Coordinate Reference System of a layer.
///
/// Layers only carry their CRS along; no reprojection happens in LayerKit,
/// so a CRS is identified by an authority code or kept as an opaque WKT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    /// Authority code, e.g. `EPSG:32719`
    Authority { authority: String, code: u32 },
    /// Anything else the host handed us
    Wkt(String),
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self::Authority {
            authority: "EPSG".to_string(),
            code,
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Self::Authority { authority, code } if authority.eq_ignore_ascii_case("EPSG") => {
                Some(*code)
            }
            _ => None,
        }
    }

    /// `AUTH:CODE` identifier, or the first 50 chars of the WKT.
    pub fn auth_id(&self) -> String {
        match self {
            Self::Authority { authority, code } => format!("{}:{}", authority, code),
            Self::Wkt(wkt) => format!("WKT:{}", wkt.chars().take(50).collect::<String>()),
        }
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        match (self, other) {
            (
                Self::Authority { authority: a, code: ca },
                Self::Authority { authority: b, code: cb },
            ) => a.eq_ignore_ascii_case(b) && ca == cb,
            (Self::Wkt(a), Self::Wkt(b)) => a == b,
            _ => false,
        }
    }
}

impl FromStr for Crs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Input("empty CRS definition".into()));
        }
        if let Some((authority, code)) = s.split_once(':') {
            if let Ok(code) = code.trim().parse::<u32>() {
                if !authority.is_empty() && authority.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Ok(Self::Authority {
                        authority: authority.to_ascii_uppercase(),
                        code,
                    });
                }
            }
        }
        Ok(Self::Wkt(s.to_string()))
    }
}

impl TryFrom<String> for Crs {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        match crs {
            Crs::Authority { authority, code } => format!("{}:{}", authority, code),
            Crs::Wkt(wkt) => wkt,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.auth_id())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = Crs::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.auth_id(), "EPSG:4326");
    }

    #[test]
    fn test_crs_parse_auth_id() {
        let crs: Crs = "epsg:32719".parse().unwrap();
        assert_eq!(crs.epsg(), Some(32719));
        assert!(crs.is_equivalent(&Crs::from_epsg(32719)));
    }

    #[test]
    fn test_crs_parse_wkt_fallback() {
        let crs: Crs = "PROJCS[\"local\"]".parse().unwrap();
        assert_eq!(crs.epsg(), None);
        assert!(matches!(crs, Crs::Wkt(_)));
    }

    #[test]
    fn test_crs_serde_as_string() {
        let json = serde_json::to_string(&Crs::from_epsg(3857)).unwrap();
        assert_eq!(json, "\"EPSG:3857\"");
        let back: Crs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Crs::from_epsg(3857));
    }
}
