//! Production units and their per-department staffing.

use std::fmt;

use super::validation::ValidationError;

/// One of the three sequential production departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Department {
    Cutting,
    Sewing,
    Finishing,
}

impl Department {
    /// All departments in production-line order.
    pub const ALL: [Department; 3] = [Department::Cutting, Department::Sewing, Department::Finishing];

    /// Position of this department in [`Department::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Department::Cutting => 0,
            Department::Sewing => 1,
            Department::Finishing => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Department::Cutting => "cutting",
            Department::Sewing => "sewing",
            Department::Finishing => "finishing",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capacity and active headcount of one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentStaff {
    /// Worker capacity (seats).
    pub workers: u32,
    /// Workers currently present. Always in `1..=workers`.
    pub attendance: u32,
}

impl DepartmentStaff {
    pub fn new(workers: u32, attendance: u32) -> Self {
        Self {
            workers,
            attendance,
        }
    }

    /// `attendance / workers`.
    pub fn attendance_ratio(&self) -> f64 {
        self.attendance as f64 / self.workers as f64
    }

    pub(crate) fn check(&self, department: Department) -> Result<(), ValidationError> {
        if self.workers == 0 {
            return Err(ValidationError::NoWorkers { department });
        }
        if self.attendance < 1 {
            return Err(ValidationError::AttendanceBelowMinimum { department });
        }
        if self.attendance > self.workers {
            return Err(ValidationError::AttendanceExceedsWorkers {
                department,
                attendance: self.attendance,
                workers: self.workers,
            });
        }
        Ok(())
    }
}

/// A production team: three departments and a daily throughput goal.
///
/// Staffing is private. A `ProductionUnit` can only be built through
/// [`ProductionUnit::new`] or `TryFrom<UnitRecord>`, both of which check
/// every staffing invariant, and attendance afterwards changes only through
/// a legal [`Move`](super::Move).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UnitRecord", into = "UnitRecord")
)]
pub struct ProductionUnit {
    staff: [DepartmentStaff; 3],
    total_workers: u32,
    daily_target: u32,
}

impl ProductionUnit {
    /// Builds a unit from `[cutting, sewing, finishing]` staffing.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_staffing::system::{Department, DepartmentStaff, ProductionUnit};
    ///
    /// let unit = ProductionUnit::new(
    ///     [
    ///         DepartmentStaff::new(10, 9),
    ///         DepartmentStaff::new(15, 14),
    ///         DepartmentStaff::new(5, 4),
    ///     ],
    ///     800,
    /// )
    /// .unwrap();
    /// assert_eq!(unit.total_workers(), 30);
    /// assert_eq!(unit.attendance(Department::Finishing), 4);
    /// ```
    pub fn new(staff: [DepartmentStaff; 3], daily_target: u32) -> Result<Self, ValidationError> {
        for department in Department::ALL {
            staff[department.index()].check(department)?;
        }
        if daily_target == 0 {
            return Err(ValidationError::NoTarget);
        }
        let total_workers = staff
            .iter()
            .try_fold(0u32, |acc, s| acc.checked_add(s.workers))
            .ok_or(ValidationError::WorkerCountOverflow)?;
        Ok(Self {
            staff,
            total_workers,
            daily_target,
        })
    }

    pub fn staff(&self, department: Department) -> DepartmentStaff {
        self.staff[department.index()]
    }

    pub fn workers(&self, department: Department) -> u32 {
        self.staff[department.index()].workers
    }

    pub fn attendance(&self, department: Department) -> u32 {
        self.staff[department.index()].attendance
    }

    pub fn attendance_ratio(&self, department: Department) -> f64 {
        self.staff[department.index()].attendance_ratio()
    }

    /// Sum of department capacities.
    pub fn total_workers(&self) -> u32 {
        self.total_workers
    }

    /// Sum of department attendances. Bounded by [`total_workers`](Self::total_workers).
    pub fn total_attendance(&self) -> u32 {
        self.staff.iter().map(|s| s.attendance).sum()
    }

    pub fn daily_target(&self) -> u32 {
        self.daily_target
    }

    /// Department with the lowest attendance ratio and that ratio.
    ///
    /// Ties go to the earliest department in line order.
    pub fn bottleneck(&self) -> (Department, f64) {
        let mut worst = (Department::Cutting, self.attendance_ratio(Department::Cutting));
        for department in [Department::Sewing, Department::Finishing] {
            let ratio = self.attendance_ratio(department);
            if ratio < worst.1 {
                worst = (department, ratio);
            }
        }
        worst
    }

    /// Whether one more worker can leave `department` (attendance stays >= 1).
    pub fn can_release(&self, department: Department) -> bool {
        self.attendance(department) > 1
    }

    /// Whether one more worker fits into `department`.
    pub fn can_receive(&self, department: Department) -> bool {
        let staff = self.staff(department);
        staff.attendance < staff.workers
    }

    pub(crate) fn shift_attendance(&mut self, department: Department, up: bool) {
        let staff = &mut self.staff[department.index()];
        if up {
            staff.attendance += 1;
        } else {
            staff.attendance -= 1;
        }
    }
}

/// Flat record shape used on the wire and in input files.
///
/// `total_workers` is carried explicitly so that a mismatching department
/// split is reported instead of silently recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRecord {
    pub total_workers: u32,
    pub cutting_workers: u32,
    pub sewing_workers: u32,
    pub finishing_workers: u32,
    pub cutting_attendance: u32,
    pub sewing_attendance: u32,
    pub finishing_attendance: u32,
    pub daily_target: u32,
}

impl TryFrom<UnitRecord> for ProductionUnit {
    type Error = ValidationError;

    fn try_from(record: UnitRecord) -> Result<Self, Self::Error> {
        let unit = ProductionUnit::new(
            [
                DepartmentStaff::new(record.cutting_workers, record.cutting_attendance),
                DepartmentStaff::new(record.sewing_workers, record.sewing_attendance),
                DepartmentStaff::new(record.finishing_workers, record.finishing_attendance),
            ],
            record.daily_target,
        )?;
        let sum = unit.total_workers();
        if sum != record.total_workers {
            return Err(ValidationError::WorkerSumMismatch {
                department_sum: sum,
                total_workers: record.total_workers,
            });
        }
        Ok(unit)
    }
}

impl From<ProductionUnit> for UnitRecord {
    fn from(unit: ProductionUnit) -> Self {
        UnitRecord::from(&unit)
    }
}

impl From<&ProductionUnit> for UnitRecord {
    fn from(unit: &ProductionUnit) -> Self {
        UnitRecord {
            total_workers: unit.total_workers(),
            cutting_workers: unit.workers(Department::Cutting),
            sewing_workers: unit.workers(Department::Sewing),
            finishing_workers: unit.workers(Department::Finishing),
            cutting_attendance: unit.attendance(Department::Cutting),
            sewing_attendance: unit.attendance(Department::Sewing),
            finishing_attendance: unit.attendance(Department::Finishing),
            daily_target: unit.daily_target,
        }
    }
}
