//! End-to-end scheduling runs against the bundled MILP backend.

use std::time::Duration;

use chrono::NaiveDate;
use u_assign::config::SchedulerConfig;
use u_assign::duration::parse_date;
use u_assign::models::{
    CapabilityEntry, Dependency, Employee, ScheduleResult, SolveStatus, Task,
};
use u_assign::scheduler::{AssignmentScheduler, ScheduleKpi, ScheduleRequest};
use u_assign::ScheduleError;

const TOL: f64 = 1e-6;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

fn config() -> SchedulerConfig {
    SchedulerConfig::new(start_date(), 8.0)
}

fn assert_clean(scheduler: &AssignmentScheduler, request: &ScheduleRequest, result: &ScheduleResult) {
    let violations = scheduler.verify(request, result).unwrap();
    assert!(violations.is_empty(), "unexpected violations: {violations:?}");
}

fn assert_single_assignment(request: &ScheduleRequest, result: &ScheduleResult) {
    for task in &request.tasks {
        let count = result
            .assignments
            .iter()
            .filter(|a| a.task_id == task.id)
            .count();
        assert_eq!(count, 1, "task {} assigned {count} times", task.id);
    }
}

#[test]
fn test_two_employees_three_tasks_with_dependency() {
    let request = ScheduleRequest::new(
        vec![
            Task::new("task1", 2.0),
            Task::new("task2", 3.0),
            Task::new("task3", 4.0),
        ],
        vec![Employee::new("E1"), Employee::new("E2")],
    )
    .with_dependency(Dependency::new("task1", "task2"));
    let scheduler = AssignmentScheduler::new(config());

    let result = scheduler.schedule(&request).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.assignment_count(), 3);
    assert_single_assignment(&request, &result);

    let (t1_start, _) = result.span("task1").unwrap();
    let (t2_start, _) = result.span("task2").unwrap();
    assert!(t2_start + TOL >= t1_start + 2.0);

    // task1 -> task2 is a 5h chain; task3 fits beside it.
    assert!((result.makespan - 5.0).abs() < TOL);
    assert!((result.latest_end() - result.makespan).abs() < TOL);
    assert_clean(&scheduler, &request, &result);
}

#[test]
fn test_precedence_uses_assigned_rate() {
    // Only the slow employee may run A; B must wait for A at that rate.
    let request = ScheduleRequest::new(
        vec![Task::new("A", 2.0), Task::new("B", 1.0)],
        vec![Employee::new("fast").with_rate(2.0), Employee::new("slow").with_rate(0.5)],
    )
    .with_capabilities(vec![
        CapabilityEntry::deny("fast", "A"),
    ])
    .with_dependency(Dependency::new("A", "B"));
    let scheduler = AssignmentScheduler::new(config());

    let result = scheduler.schedule(&request).unwrap();
    let a = result.assignment_for_task("A").unwrap();
    assert_eq!(a.employee_id, "slow");
    assert!((a.duration() - 4.0).abs() < TOL);
    let (b_start, _) = result.span("B").unwrap();
    assert!(b_start + TOL >= 4.0);
    // B on the fast employee: 4 + 0.5
    assert!((result.makespan - 4.5).abs() < TOL);
    assert_clean(&scheduler, &request, &result);
}

#[test]
fn test_single_employee_follows_id_order() {
    let request = ScheduleRequest::new(
        vec![
            Task::new("T3", 1.0),
            Task::new("T1", 2.0),
            Task::new("T2", 3.0),
        ],
        vec![Employee::new("E1")],
    );
    let scheduler = AssignmentScheduler::new(config());

    let result = scheduler.schedule(&request).unwrap();
    assert!((result.makespan - 6.0).abs() < TOL);

    let list = result.assignments_for_employee("E1");
    let order: Vec<&str> = list.iter().map(|a| a.task_id.as_str()).collect();
    assert_eq!(order, vec!["T1", "T2", "T3"]);
    for pair in list.windows(2) {
        assert!(pair[0].end <= pair[1].start + TOL);
    }
}

#[test]
fn test_deadlines_are_met() {
    let request = ScheduleRequest::new(
        vec![
            Task::new("T1", 6.0),
            Task::new("T2", 6.0),
            Task::new("T3", 4.0).with_deadline(start_date()),
        ],
        vec![Employee::new("E1"), Employee::new("E2")],
    );
    let scheduler = AssignmentScheduler::new(config());

    let result = scheduler.schedule(&request).unwrap();
    let (_, t3_end) = result.span("T3").unwrap();
    assert!(t3_end <= 8.0 + TOL);
    assert_clean(&scheduler, &request, &result);

    let kpi = ScheduleKpi::calculate(&result, &request.tasks);
    assert_eq!(kpi.deadline_tasks, 1);
    assert!(kpi.min_deadline_slack.unwrap() >= -TOL);
}

#[test]
fn test_over_constrained_is_infeasible() {
    // Both tasks only on E1, 10h of work before an 8h deadline.
    let request = ScheduleRequest::new(
        vec![
            Task::new("T1", 5.0).with_deadline(start_date()),
            Task::new("T2", 5.0).with_deadline(start_date()),
        ],
        vec![Employee::new("E1"), Employee::new("E2")],
    )
    .with_capabilities(vec![
        CapabilityEntry::allow("E1", "T1"),
        CapabilityEntry::allow("E1", "T2"),
    ]);

    let err = AssignmentScheduler::new(config())
        .schedule(&request)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InfeasibleSolution), "got {err:?}");
}

#[test]
fn test_skill_conflict_any_order() {
    let tasks = vec![Task::new("T1", 1.0)];
    let employees = vec![Employee::new("E1"), Employee::new("E2")];
    let orders = [
        vec![CapabilityEntry::allow("E1", "T1"), CapabilityEntry::deny("E2", "T1")],
        vec![CapabilityEntry::deny("E2", "T1"), CapabilityEntry::allow("E1", "T1")],
    ];

    for entries in orders {
        let request =
            ScheduleRequest::new(tasks.clone(), employees.clone()).with_capabilities(entries);
        match AssignmentScheduler::new(config()).schedule(&request) {
            Err(ScheduleError::SkillConflict { task, .. }) => assert_eq!(task, "T1"),
            other => panic!("expected SkillConflict, got {other:?}"),
        }
    }
}

#[test]
fn test_deadline_before_start_is_invalid_date() {
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 1.0).with_deadline(parse_date("20240331").unwrap())],
        vec![Employee::new("E1")],
    );

    let err = AssignmentScheduler::new(config())
        .schedule(&request)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidDate { .. }), "got {err:?}");
}

#[test]
fn test_cyclic_dependencies_rejected() {
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 1.0), Task::new("T2", 1.0)],
        vec![Employee::new("E1")],
    )
    .with_dependencies(vec![Dependency::new("T1", "T2"), Dependency::new("T2", "T1")]);

    let err = AssignmentScheduler::new(config())
        .schedule(&request)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn test_rate_scaling_toggle() {
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 4.0)],
        vec![Employee::new("E1").with_rate(2.0)],
    );

    let scaled = AssignmentScheduler::new(config())
        .schedule(&request)
        .unwrap();
    assert!((scaled.makespan - 2.0).abs() < TOL);

    let flat = AssignmentScheduler::new(config().with_rate_scaling(false))
        .schedule(&request)
        .unwrap();
    assert!((flat.makespan - 4.0).abs() < TOL);
}

#[test]
fn test_daily_capacity_spreads_work() {
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 4.0), Task::new("T2", 4.0)],
        vec![Employee::new("E1").with_max_hours_per_day(6.0)],
    );
    let scheduler = AssignmentScheduler::new(config().with_daily_capacity(3));

    let result = scheduler.schedule(&request).unwrap();
    assert_single_assignment(&request, &result);
    assert!((result.makespan - 12.0).abs() < TOL);
    for a in &result.assignments {
        let day = a.day.expect("daily mode records the day");
        let day_start = day as f64 * 8.0;
        assert!(a.start + TOL >= day_start);
        assert!(a.end <= day_start + 8.0 + TOL);
    }
    assert_clean(&scheduler, &request, &result);
}

#[test]
fn test_daily_capacity_requires_caps() {
    let request = ScheduleRequest::new(vec![Task::new("T1", 1.0)], vec![Employee::new("E1")]);

    let err = AssignmentScheduler::new(config().with_daily_capacity(2))
        .schedule(&request)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn test_time_limit_generous_budget() {
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 1.0), Task::new("T2", 2.0), Task::new("T3", 3.0)],
        vec![Employee::new("E1"), Employee::new("E2")],
    );
    let cfg = config().with_time_limit(Duration::from_secs(60));

    let result = AssignmentScheduler::new(cfg).schedule(&request).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    // T3 alone, T1 + T2 together.
    assert!((result.makespan - 3.0).abs() < TOL);
}

#[test]
fn test_repeated_runs_are_independent() {
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 2.0), Task::new("T2", 2.0)],
        vec![Employee::new("E1"), Employee::new("E2")],
    );
    let scheduler = AssignmentScheduler::new(config());

    let first = scheduler.schedule(&request).unwrap();
    let second = scheduler.schedule(&request).unwrap();
    assert!((first.makespan - second.makespan).abs() < TOL);
    assert_eq!(first.assignment_count(), second.assignment_count());
}

#[test]
fn test_expired_budget_is_time_limited() {
    let tasks = (1..=8)
        .map(|i| Task::new(format!("T{i}"), 1.0 + i as f64 * 0.5))
        .collect();
    let employees = vec![
        Employee::new("E1"),
        Employee::new("E2").with_rate(0.8),
        Employee::new("E3").with_rate(1.25),
    ];
    let request = ScheduleRequest::new(tasks, employees);
    let cfg = config().with_time_limit(Duration::from_nanos(1));

    match AssignmentScheduler::new(cfg).schedule(&request) {
        Err(ScheduleError::UnresolvedSolverStatus(status)) => {
            assert_eq!(status, SolveStatus::TimeLimited)
        }
        other => panic!("expected a time-limited outcome, got {other:?}"),
    }
}

#[test]
fn test_daily_dependency_pushes_successor_to_next_day() {
    // A and B cannot share an 8h day, so B waits for day 2.
    let request = ScheduleRequest::new(
        vec![Task::new("A", 6.0), Task::new("B", 4.0)],
        vec![Employee::new("E1").with_max_hours_per_day(8.0)],
    )
    .with_dependency(Dependency::new("A", "B"));
    let scheduler = AssignmentScheduler::new(config().with_daily_capacity(3));

    let result = scheduler.schedule(&request).unwrap();
    let a = result.assignment_for_task("A").unwrap();
    let b = result.assignment_for_task("B").unwrap();
    assert!(b.day.unwrap() > a.day.unwrap());
    assert!(b.start + TOL >= a.end);
    assert!(b.start + TOL >= 8.0);
    assert!((result.makespan - 12.0).abs() < TOL);
    assert_clean(&scheduler, &request, &result);
}

#[test]
fn test_daily_deadline_is_infeasible() {
    // B cannot start before A ends at 6h, so it cannot end within day 1.
    let request = ScheduleRequest::new(
        vec![
            Task::new("A", 6.0),
            Task::new("B", 4.0).with_deadline(start_date()),
        ],
        vec![Employee::new("E1").with_max_hours_per_day(8.0)],
    )
    .with_dependency(Dependency::new("A", "B"));

    let err = AssignmentScheduler::new(config().with_daily_capacity(3))
        .schedule(&request)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InfeasibleSolution), "got {err:?}");
}

#[test]
fn test_daily_cap_counts_nominal_hours_for_slow_employee() {
    // 4h of work at rate 0.5 fills the 8h day but only 4h of the 6h cap.
    let request = ScheduleRequest::new(
        vec![Task::new("T1", 4.0)],
        vec![Employee::new("E1").with_rate(0.5).with_max_hours_per_day(6.0)],
    );
    let scheduler = AssignmentScheduler::new(config().with_daily_capacity(2));

    let result = scheduler.schedule(&request).unwrap();
    assert!((result.makespan - 8.0).abs() < TOL);
    assert_eq!(result.assignments[0].day, Some(0));
    assert_clean(&scheduler, &request, &result);
}
