//! Failure injection for the local [`Cache`](crate::cache::Cache), so that tests can exercise error paths

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};

/// The task source operations that can be made to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    GetTasks,
    GetTask,
    AddTask,
    UpdateTask,
    DeleteTask,
    ToggleTask,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::GetTasks,
        Operation::GetTask,
        Operation::AddTask,
        Operation::UpdateTask,
        Operation::DeleteTask,
        Operation::ToggleTask,
    ];
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::GetTasks => "get_tasks",
            Operation::GetTask => "get_task",
            Operation::AddTask => "add_task",
            Operation::UpdateTask => "update_task",
            Operation::DeleteTask => "delete_task",
            Operation::ToggleTask => "toggle_task",
        };
        write!(f, "{}", name)
    }
}

/// An operation first succeeds `successes` times, then fails `failures` times, then succeeds forever
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Budget {
    pub successes: u32,
    pub failures: u32,
}

impl Budget {
    pub fn new(successes: u32, failures: u32) -> Self {
        Self { successes, failures }
    }

    /// Spend one call. Returns whether this call is allowed
    fn spend(&mut self) -> bool {
        if self.successes > 0 {
            self.successes -= 1;
            true
        } else if self.failures > 0 {
            self.failures -= 1;
            false
        } else {
            true
        }
    }
}

/// How a mocked source behaves during a given test.
///
/// Operations without a [`Budget`] always succeed.
#[derive(Clone, Debug, Default)]
pub struct MockBehaviour {
    is_suspended: bool,
    budgets: HashMap<Operation, Budget>,
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails at once, `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        let mut behaviour = Self::new();
        for op in Operation::ALL.iter() {
            behaviour.set(*op, Budget::new(0, n_fails));
        }
        behaviour
    }

    /// Builder-style version of [`Self::set`]
    pub fn with(mut self, op: Operation, budget: Budget) -> Self {
        self.set(op, budget);
        self
    }

    pub fn set(&mut self, op: Operation, budget: Budget) {
        self.budgets.insert(op, budget);
    }

    /// What is left of the budget of an operation
    pub fn remaining(&self, op: Operation) -> Budget {
        self.budgets.get(&op).copied().unwrap_or_default()
    }

    /// Let every call through until [`Self::resume`] is called. Budgets are not spent meanwhile
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }

    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    /// Spend one call of `op`, and fail if its budget says so
    pub fn check(&mut self, op: Operation) -> Result<()> {
        if self.is_suspended {
            return Ok(());
        }
        let budget = match self.budgets.get_mut(&op) {
            None => return Ok(()),
            Some(budget) => budget,
        };

        if budget.spend() {
            log::debug!("Mock behaviour: allowing {} ({:?})", op, budget);
            Ok(())
        } else {
            log::debug!("Mock behaviour: failing {} ({:?})", op, budget);
            Err(Error::Mocked(format!("{} was set to fail ({} more failures to come)", op, budget.failures)))
        }
    }
}
