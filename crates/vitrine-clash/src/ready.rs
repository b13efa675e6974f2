/// Whether the viewer has finished its initial model loading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadyState {
    #[default]
    Loading,
    Initialized,
}

/// Join point for the initial model loads.
///
/// Each configured source is first checked for availability; available ones
/// become expected loads. The barrier opens once every source was checked and
/// every expected load has settled, successfully or not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadBarrier {
    sources: usize,
    checked: usize,
    expected: usize,
    settled: usize,
}

impl LoadBarrier {
    pub fn new(sources: usize) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    pub fn source_checked(&mut self, available: bool) -> bool {
        self.checked += 1;
        if available {
            self.expected += 1;
        }
        self.is_complete()
    }

    pub fn model_settled(&mut self) -> bool {
        self.settled += 1;
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.checked >= self.sources && self.settled >= self.expected
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn settled(&self) -> usize {
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sources_is_complete() {
        assert!(LoadBarrier::new(0).is_complete());
    }

    #[test]
    fn waits_for_checks_and_loads() {
        let mut barrier = LoadBarrier::new(3);
        assert!(!barrier.source_checked(true));
        assert!(!barrier.source_checked(false));
        assert!(!barrier.model_settled());
        assert!(!barrier.source_checked(true));
        assert!(barrier.model_settled());
        assert_eq!(barrier.expected(), 2);
        assert_eq!(barrier.settled(), 2);
    }

    #[test]
    fn unavailable_sources_do_not_block() {
        let mut barrier = LoadBarrier::new(2);
        barrier.source_checked(false);
        assert!(barrier.source_checked(false));
    }
}
