//! Write-once storage for fields that may be reported more than once.

/// Holds a value that may be written repeatedly only with the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOnce<T> {
    value: Option<T>,
}

/// A second write that disagrees with the stored value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict<T> {
    pub first: T,
    pub second: T,
}

impl<T> Default for SetOnce<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: PartialEq + Clone> SetOnce<T> {
    /// Store `value`, or confirm it equals the stored one.
    pub fn set(&mut self, value: T) -> Result<(), Conflict<T>> {
        match &self.value {
            Some(first) if *first != value => Err(Conflict {
                first: first.clone(),
                second: value,
            }),
            Some(_) => Ok(()),
            None => {
                self.value = Some(value);
                Ok(())
            }
        }
    }
}

impl<T> SetOnce<T> {
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins_and_equal_rewrite_is_fine() {
        let mut cell = SetOnce::default();
        assert!(!cell.is_set());
        cell.set("DE12").unwrap();
        cell.set("DE12").unwrap();
        assert_eq!(cell.get(), Some(&"DE12"));
    }

    #[test]
    fn test_conflicting_write_is_reported() {
        let mut cell = SetOnce::default();
        cell.set(1).unwrap();
        assert_eq!(cell.set(2), Err(Conflict { first: 1, second: 2 }));
        assert_eq!(cell.into_inner(), Some(1));
    }
}
