//! Snapshots of the currently active breakpoints.

/// The set of breakpoints active after a media change.
///
/// An activation records which alias triggered it, whether overlap mode
/// was in effect, and every alias that is active as a result. Without
/// overlap mode only the triggering alias is active.
///
/// ```rust
/// use flexout_media::Activation;
///
/// let activation = Activation::overlapping("xl", ["xl", "gt-sm", "gt-xs"]);
/// assert!(activation.is_active("gt-sm"));
/// assert_eq!(activation.alias(), Some("xl"));
///
/// // Without overlaps only the trigger is a candidate.
/// let single = Activation::single("xl");
/// assert_eq!(single.candidates().collect::<Vec<_>>(), vec!["xl"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Activation {
    alias: Option<String>,
    overlaps: bool,
    active: Vec<String>,
}

impl Activation {
    /// No breakpoint is active.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only `alias` is active.
    pub fn single(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            active: vec![alias.clone()],
            alias: Some(alias),
            overlaps: false,
        }
    }

    /// `alias` triggered the change and every alias in `active` matches.
    ///
    /// The trigger is always included in the active set.
    pub fn overlapping<I, S>(alias: impl Into<String>, active: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alias = alias.into();
        let mut all: Vec<String> = Vec::new();
        for name in std::iter::once(alias.clone()).chain(active.into_iter().map(Into::into)) {
            if !all.contains(&name) {
                all.push(name);
            }
        }
        Self {
            alias: Some(alias),
            overlaps: true,
            active: all,
        }
    }

    /// The alias that triggered this activation, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Whether overlap mode produced this activation.
    pub fn overlaps(&self) -> bool {
        self.overlaps
    }

    /// Every active alias, trigger first.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    pub fn is_active(&self, alias: &str) -> bool {
        self.active.iter().any(|a| a == alias)
    }

    /// Returns `true` if nothing is active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Aliases an element may select an override from.
    ///
    /// In overlap mode that is every active alias; otherwise only the
    /// triggering alias is considered.
    pub fn candidates(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.overlaps {
            Box::new(self.active())
        } else {
            Box::new(self.alias().into_iter())
        }
    }
}
