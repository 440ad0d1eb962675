//! Single-worker transfers between units.

use super::types::{Department, ProductionUnit};

/// Transfer of one attending worker from `from` to `to` within `department`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub department: Department,
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(department: Department, from: usize, to: usize) -> Self {
        Self {
            department,
            from,
            to,
        }
    }

    /// The transfer that undoes this one.
    pub fn inverse(self) -> Self {
        Self {
            department: self.department,
            from: self.to,
            to: self.from,
        }
    }

    /// A move is legal when both indices exist and differ, the source keeps
    /// at least one worker and the destination has a free seat.
    pub fn is_legal(&self, units: &[ProductionUnit]) -> bool {
        if self.from == self.to {
            return false;
        }
        match (units.get(self.from), units.get(self.to)) {
            (Some(source), Some(dest)) => {
                source.can_release(self.department) && dest.can_receive(self.department)
            }
            _ => false,
        }
    }

    /// Applies the move if it is legal. Returns whether anything changed.
    pub fn apply(&self, units: &mut [ProductionUnit]) -> bool {
        if !self.is_legal(units) {
            return false;
        }
        units[self.from].shift_attendance(self.department, false);
        units[self.to].shift_attendance(self.department, true);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::DepartmentStaff;

    fn units() -> Vec<ProductionUnit> {
        vec![
            ProductionUnit::new(
                [
                    DepartmentStaff::new(10, 9),
                    DepartmentStaff::new(15, 14),
                    DepartmentStaff::new(5, 4),
                ],
                800,
            )
            .unwrap(),
            ProductionUnit::new(
                [
                    DepartmentStaff::new(8, 7),
                    DepartmentStaff::new(12, 11),
                    DepartmentStaff::new(5, 5),
                ],
                600,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_apply_then_inverse_restores() {
        let mut state = units();
        let before = state.clone();
        let mv = Move::new(Department::Finishing, 1, 0);
        assert!(mv.apply(&mut state));
        assert_eq!(state[0].attendance(Department::Finishing), 5);
        assert_eq!(state[1].attendance(Department::Finishing), 4);
        assert!(mv.inverse().apply(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn test_destination_at_capacity_is_illegal() {
        let mut state = units();
        let mv = Move::new(Department::Finishing, 0, 1);
        assert!(!mv.is_legal(&state));
        assert!(!mv.apply(&mut state));
        assert_eq!(state, units());
    }

    #[test]
    fn test_source_at_minimum_is_illegal() {
        let mut state = vec![
            ProductionUnit::new(
                [
                    DepartmentStaff::new(2, 1),
                    DepartmentStaff::new(2, 2),
                    DepartmentStaff::new(2, 2),
                ],
                10,
            )
            .unwrap(),
            ProductionUnit::new(
                [
                    DepartmentStaff::new(4, 1),
                    DepartmentStaff::new(2, 2),
                    DepartmentStaff::new(2, 2),
                ],
                10,
            )
            .unwrap(),
        ];
        assert!(!Move::new(Department::Cutting, 0, 1).apply(&mut state));
    }

    #[test]
    fn test_self_and_out_of_range_moves_are_illegal() {
        let state = units();
        assert!(!Move::new(Department::Cutting, 0, 0).is_legal(&state));
        assert!(!Move::new(Department::Cutting, 0, 2).is_legal(&state));
    }
}
