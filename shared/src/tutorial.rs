/// Client storage key for the "tutorial seen" flag.
pub const TUTORIAL_STORAGE_KEY: &str = "flood-dashboard-tutorial";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Center,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    /// CSS selector of the element the step points at.
    pub target: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub warning: Option<&'static str>,
    pub placement: Placement,
}

pub const TUTORIAL_STEPS: &[TutorialStep] = &[
    TutorialStep {
        target: "body",
        title: "¡Bienvenido al Dashboard de Riesgo Hídrico!",
        body: "Te mostraremos las funciones básicas para usar el mapa.",
        warning: Some(
            "Este es un proyecto piloto. Los datos mostrados son preliminares y están en desarrollo.",
        ),
        placement: Placement::Center,
    },
    TutorialStep {
        target: ".control-panel",
        title: "Panel de Control",
        body: "Aquí puedes activar/desactivar las capas de información y cambiar el tipo de mapa base.",
        warning: None,
        placement: Placement::Right,
    },
    TutorialStep {
        target: ".tutorial-button",
        title: "Tutorial",
        body: "Haz clic en este botón para acceder al tutorial interactivo y aprender a usar el mapa.",
        warning: None,
        placement: Placement::Right,
    },
    TutorialStep {
        target: ".maplibregl-ctrl-geolocate",
        title: "Mi Ubicación",
        body: "Haz clic para centrar el mapa en tu ubicación actual.",
        warning: None,
        placement: Placement::Left,
    },
];

pub mod locale {
    pub const BACK: &str = "Atrás";
    pub const CLOSE: &str = "Cerrar";
    pub const LAST: &str = "Finalizar";
    pub const NEXT: &str = "Siguiente";
    pub const SKIP: &str = "Saltar tutorial";
}

/// Persistence for the seen flag.
pub trait TutorialStore {
    fn seen(&self) -> bool;
    fn mark_seen(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialState {
    NotStarted,
    Running { step: usize },
    Finished,
    Skipped,
}

/// Linear walk-through. `Finished` and `Skipped` are reported by the transition that reaches
/// them; the machine itself settles back to `NotStarted` so the help action can restart it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialMachine {
    state: TutorialState,
    steps: &'static [TutorialStep],
}

impl TutorialMachine {
    /// First-ever visit starts running; later visits wait for the help action.
    pub fn for_visit(store: &impl TutorialStore) -> Self {
        Self::with_steps(store, TUTORIAL_STEPS)
    }

    pub fn with_steps(store: &impl TutorialStore, steps: &'static [TutorialStep]) -> Self {
        let state = if store.seen() || steps.is_empty() {
            TutorialState::NotStarted
        } else {
            TutorialState::Running { step: 0 }
        };
        Self { state, steps }
    }

    pub fn state(&self) -> TutorialState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TutorialState::Running { .. })
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step(&self) -> Option<(usize, &'static TutorialStep)> {
        match self.state {
            TutorialState::Running { step } => self.steps.get(step).map(|s| (step, s)),
            _ => None,
        }
    }

    pub fn is_last_step(&self) -> bool {
        matches!(self.state, TutorialState::Running { step } if step + 1 >= self.steps.len())
    }

    /// Help action. Only valid from `NotStarted`.
    pub fn start(&mut self) -> bool {
        if self.state != TutorialState::NotStarted || self.steps.is_empty() {
            return false;
        }
        self.state = TutorialState::Running { step: 0 };
        true
    }

    /// Advance one step; advancing past the last step finishes the tour.
    pub fn next(&mut self, store: &mut impl TutorialStore) -> TutorialState {
        let TutorialState::Running { step } = self.state else {
            return self.state;
        };
        if step + 1 < self.steps.len() {
            self.state = TutorialState::Running { step: step + 1 };
            return self.state;
        }
        self.settle(store, TutorialState::Finished)
    }

    pub fn back(&mut self) -> TutorialState {
        if let TutorialState::Running { step } = self.state {
            self.state = TutorialState::Running {
                step: step.saturating_sub(1),
            };
        }
        self.state
    }

    /// Close the tour from its last step. Earlier steps must be walked with [`Self::next`].
    pub fn finish(&mut self, store: &mut impl TutorialStore) -> TutorialState {
        if !self.is_last_step() {
            return self.state;
        }
        self.settle(store, TutorialState::Finished)
    }

    /// Dismiss early.
    pub fn skip(&mut self, store: &mut impl TutorialStore) -> TutorialState {
        if !self.is_running() {
            return self.state;
        }
        self.settle(store, TutorialState::Skipped)
    }

    fn settle(&mut self, store: &mut impl TutorialStore, outcome: TutorialState) -> TutorialState {
        store.mark_seen();
        self.state = TutorialState::NotStarted;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        seen: bool,
        writes: usize,
    }

    impl TutorialStore for MemoryStore {
        fn seen(&self) -> bool {
            self.seen
        }

        fn mark_seen(&mut self) {
            self.seen = true;
            self.writes += 1;
        }
    }

    #[test]
    fn first_visit_runs_automatically() {
        let store = MemoryStore::default();
        let machine = TutorialMachine::for_visit(&store);
        assert_eq!(machine.state(), TutorialState::Running { step: 0 });
        assert_eq!(machine.current_step().map(|(_, s)| s.target), Some("body"));
    }

    #[test]
    fn completing_persists_and_next_visit_does_not_autostart() {
        let mut store = MemoryStore::default();
        let mut machine = TutorialMachine::for_visit(&store);
        let mut last = machine.state();
        for _ in 0..machine.step_count() {
            last = machine.next(&mut store);
        }
        assert_eq!(last, TutorialState::Finished);
        assert_eq!(machine.state(), TutorialState::NotStarted);
        assert!(store.seen);

        let reload = TutorialMachine::for_visit(&store);
        assert_eq!(reload.state(), TutorialState::NotStarted);
    }

    #[test]
    fn skipping_persists_seen_flag() {
        let mut store = MemoryStore::default();
        let mut machine = TutorialMachine::for_visit(&store);
        machine.next(&mut store);
        assert_eq!(machine.skip(&mut store), TutorialState::Skipped);
        assert_eq!(store.writes, 1);
        assert!(!TutorialMachine::for_visit(&store).is_running());
    }

    #[test]
    fn help_action_restarts_from_first_step() {
        let mut store = MemoryStore {
            seen: true,
            writes: 0,
        };
        let mut machine = TutorialMachine::for_visit(&store);
        assert!(machine.start());
        assert!(!machine.start());
        assert_eq!(machine.state(), TutorialState::Running { step: 0 });
        assert_eq!(machine.skip(&mut store), TutorialState::Skipped);
        assert!(machine.start());
    }

    #[test]
    fn transitions_outside_running_are_ignored() {
        let mut store = MemoryStore {
            seen: true,
            writes: 0,
        };
        let mut machine = TutorialMachine::for_visit(&store);
        assert_eq!(machine.next(&mut store), TutorialState::NotStarted);
        assert_eq!(machine.skip(&mut store), TutorialState::NotStarted);
        assert_eq!(machine.back(), TutorialState::NotStarted);
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn finish_only_applies_on_the_last_step() {
        let mut store = MemoryStore::default();
        let mut machine = TutorialMachine::for_visit(&store);
        assert_eq!(machine.finish(&mut store), TutorialState::Running { step: 0 });
        assert!(!store.seen);

        while !machine.is_last_step() {
            machine.next(&mut store);
        }
        assert_eq!(machine.finish(&mut store), TutorialState::Finished);
        assert_eq!(machine.state(), TutorialState::NotStarted);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn back_stays_on_first_step() {
        let mut store = MemoryStore::default();
        let mut machine = TutorialMachine::for_visit(&store);
        assert_eq!(machine.back(), TutorialState::Running { step: 0 });
        machine.next(&mut store);
        machine.next(&mut store);
        assert_eq!(machine.back(), TutorialState::Running { step: 1 });
        assert!(!machine.is_last_step());
    }
}
