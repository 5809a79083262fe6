//! The fixed, ordered collection of demonstration units.
//!
//! A registry is validated once when it is built and never mutated
//! afterwards. Narrowing with [`Registry::select`] produces a new registry.

use std::collections::HashSet;

use crate::catalog;
use crate::error::RegistryError;
use crate::unit::DemonstrationUnit;

const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug)]
pub struct Registry {
    units: Vec<DemonstrationUnit>,
}

impl Registry {
    /// Validates names and freezes the order.
    ///
    /// Names are checked in registration order and the first bad entry,
    /// empty or repeated, is the one reported.
    pub fn new(units: Vec<DemonstrationUnit>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(units.len());
        for (position, unit) in units.iter().enumerate() {
            let name = unit.name();
            if name.trim().is_empty() {
                return Err(RegistryError::EmptyName { position });
            }
            if !seen.insert(name) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
        }

        Ok(Self { units })
    }

    /// Registry holding every built-in demonstration.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(catalog::units())
    }

    pub fn list(&self) -> &[DemonstrationUnit] {
        &self.units
    }

    pub fn get(&self, name: &str) -> Option<&DemonstrationUnit> {
        self.units.iter().find(|u| u.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Keeps only the named units, in registration order.
    ///
    /// Repeated names are ignored. Unknown names fail, with a close match
    /// offered as a suggestion when there is one.
    pub fn select(self, names: &[String]) -> Result<Self, RegistryError> {
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            let suggestion = find_similar_name(unknown, self.names());
            return Err(RegistryError::unknown_unit(unknown.clone(), suggestion));
        }

        let units = self
            .units
            .into_iter()
            .filter(|u| names.iter().any(|n| n == u.name()))
            .collect();

        Ok(Self { units })
    }
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

fn find_similar_name<'a>(typo: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    candidates
        .map(|name| (levenshtein_distance(typo, name), name))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;

    fn unit(name: &str) -> DemonstrationUnit {
        DemonstrationUnit::new(name, || Ok(1))
    }

    fn names(registry: &Registry) -> Vec<&str> {
        registry.names().collect()
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let registry = Registry::new(vec![unit("c"), unit("a"), unit("b")]).unwrap();
        assert_eq!(names(&registry), vec!["c", "a", "b"]);
        assert_eq!(registry.list().len(), 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let err = Registry::new(vec![unit("double"), unit("boom"), unit("double")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("double".into()));
    }

    #[test]
    fn test_first_duplicate_is_reported() {
        let err = Registry::new(vec![unit("a"), unit("b"), unit("b"), unit("a")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("b".into()));
    }

    #[test]
    fn test_construction_does_not_run_units() {
        let panicking = DemonstrationUnit::new("loud", || -> Result<(), UnitError> {
            panic!("must not run during construction")
        });
        let err = Registry::new(vec![panicking, unit("x"), unit("x")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(_)));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = Registry::new(vec![unit("a"), unit("  ")]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyName { position: 1 });
    }

    #[test]
    fn test_earliest_problem_wins() {
        let err = Registry::new(vec![unit("a"), unit("a"), unit("")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("a".into()));

        let err = Registry::new(vec![unit("b"), unit(""), unit("b")]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyName { position: 1 });
    }

    #[test]
    fn test_empty_registry_is_allowed() {
        let registry = Registry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get() {
        let registry = Registry::new(vec![unit("a"), unit("b")]).unwrap();
        assert_eq!(registry.get("b").map(|u| u.name()), Some("b"));
        assert!(registry.get("z").is_none());
    }

    #[test]
    fn test_select_keeps_registration_order() {
        let registry = Registry::new(vec![unit("a"), unit("b"), unit("c")]).unwrap();
        let selected = registry
            .select(&["c".to_string(), "a".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(names(&selected), vec!["a", "c"]);
    }

    #[test]
    fn test_select_unknown_name_suggests() {
        let registry = Registry::new(vec![unit("double"), unit("boom")]).unwrap();
        let err = registry.select(&["dubble".to_string()]).unwrap_err();
        assert_eq!(err, RegistryError::unknown_unit("dubble", Some("double".into())));
    }

    #[test]
    fn test_select_unknown_name_without_match() {
        let registry = Registry::new(vec![unit("double")]).unwrap();
        let err = registry.select(&["something-else".to_string()]).unwrap_err();
        assert_eq!(err, RegistryError::unknown_unit("something-else", None));
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = Registry::builtin().unwrap();
        assert!(!registry.is_empty());
        assert!(registry.get("main.convert_currency").is_some());
    }
}
