use crate::domain::models::{
    ApprovalDecision, ApprovalStatus, DoctorApproval, ScheduleStatus, Shift,
};
use std::collections::BTreeMap;

pub fn apply_decisions(shifts: &mut [Shift], decisions: &[ApprovalDecision]) -> Vec<String> {
    let mut unknown = Vec::new();
    for decision in decisions {
        let shift_id = decision.shift_id.trim();
        match shifts.iter_mut().find(|shift| shift.id == shift_id) {
            Some(shift) => shift.status = decision.status,
            None => unknown.push(shift_id.to_string()),
        }
    }
    unknown
}

pub fn reconcile(shifts: &[Shift]) -> Vec<DoctorApproval> {
    let mut per_doctor: BTreeMap<&str, (u32, u32, u32)> = BTreeMap::new();
    for shift in shifts {
        let counts = per_doctor.entry(shift.doctor_id.as_str()).or_default();
        match shift.status {
            ApprovalStatus::Approved => counts.0 += 1,
            ApprovalStatus::Rejected => counts.1 += 1,
            ApprovalStatus::Pending => counts.2 += 1,
        }
    }

    per_doctor
        .into_iter()
        .map(|(doctor_id, (approved, rejected, pending))| DoctorApproval {
            doctor_id: doctor_id.to_string(),
            approved,
            rejected,
            pending,
            status: schedule_status(approved, rejected, pending),
        })
        .collect()
}

fn schedule_status(approved: u32, rejected: u32, pending: u32) -> ScheduleStatus {
    if pending > 0 {
        ScheduleStatus::Pending
    } else if rejected == 0 {
        ScheduleStatus::Approved
    } else if approved == 0 {
        ScheduleStatus::Rejected
    } else {
        ScheduleStatus::PartiallyApproved
    }
}
