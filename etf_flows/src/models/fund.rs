//! Fund identifiers and the named fund sets built from sheet headers.

use std::{borrow::Borrow, fmt};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::ViewError;

/// A ticker symbol identifying one fund (e.g. "ARKK", "SPY").
///
/// Always trimmed and non-empty; construct through [`FundId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundId(String);

impl FundId {
    /// Trims `raw` and returns `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FundId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FundId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named, ordered, immutable set of fund identifiers.
///
/// Two universes exist per loaded dataset: the focus family and the larger
/// comparison universe. Order follows the sheet headers and is used as the
/// default display/legend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundUniverse {
    name: String,
    funds: IndexSet<FundId>,
}

impl FundUniverse {
    pub fn new(name: impl Into<String>, funds: impl IntoIterator<Item = FundId>) -> Self {
        Self {
            name: name.into(),
            funds: funds.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn funds(&self) -> &IndexSet<FundId> {
        &self.funds
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    pub fn contains(&self, fund: &str) -> bool {
        self.funds.contains(fund)
    }

    /// Resolves user-supplied names into a subset of this universe.
    ///
    /// Names are trimmed and de-duplicated; blank entries are ignored. An
    /// empty input selects every fund. The returned subset follows the
    /// universe's order, not the input order.
    ///
    /// Errors:
    /// - [`ViewError::UnknownFund`] for a name not in the universe
    /// - [`ViewError::InvalidSubset`] when the universe itself is empty
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<IndexSet<FundId>, ViewError> {
        let wanted: IndexSet<FundId> = names.iter().filter_map(|n| FundId::new(n.as_ref())).collect();

        let subset: IndexSet<FundId> = if wanted.is_empty() {
            self.funds.clone()
        } else {
            if let Some(unknown) = wanted.iter().find(|f| !self.funds.contains(*f)) {
                return Err(ViewError::UnknownFund {
                    fund: unknown.to_string(),
                    universe: self.name.clone(),
                });
            }
            self.funds
                .iter()
                .filter(|f| wanted.contains(*f))
                .cloned()
                .collect()
        };

        if subset.is_empty() {
            return Err(ViewError::InvalidSubset);
        }
        Ok(subset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<FundId> {
        names.iter().map(|n| FundId::new(n).unwrap()).collect()
    }

    #[test]
    fn fund_id_trims_and_rejects_blank() {
        assert_eq!(FundId::new("  ARKK ").unwrap().as_str(), "ARKK");
        assert!(FundId::new("   ").is_none());
    }

    #[test]
    fn select_keeps_universe_order() {
        let u = FundUniverse::new("ARK Funds", ids(&["ARKK", "ARKF", "ARKG"]));
        let picked = u.select(&["ARKG", " ARKK", "ARKG"]).unwrap();
        let order: Vec<&str> = picked.iter().map(FundId::as_str).collect();
        assert_eq!(order, vec!["ARKK", "ARKG"]);
    }

    #[test]
    fn select_empty_means_everything() {
        let u = FundUniverse::new("ARK Funds", ids(&["ARKK", "ARKF"]));
        let none: [&str; 0] = [];
        assert_eq!(u.select(&none).unwrap().len(), 2);
        assert_eq!(u.select(&["", "  "]).unwrap().len(), 2);
    }

    #[test]
    fn select_rejects_unknown() {
        let u = FundUniverse::new("ARK Funds", ids(&["ARKK"]));
        let err = u.select(&["SPY"]).unwrap_err();
        assert!(matches!(err, ViewError::UnknownFund { ref fund, .. } if fund == "SPY"));
    }

    #[test]
    fn select_on_empty_universe_is_invalid() {
        let u = FundUniverse::new("nothing", Vec::new());
        let none: [&str; 0] = [];
        assert!(matches!(u.select(&none), Err(ViewError::InvalidSubset)));
    }
}
