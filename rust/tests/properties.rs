use std::collections::BTreeSet;

use proptest::prelude::*;

use crewplan::{
    find_minimum_workers, verify_schedule, ScheduleError, SchedulerConfig, Task, TaskId,
    TieBreak, Time, WorkerSelection,
};

// Strategy for an acyclic task set.
// Acyclicity holds because task i may only depend on tasks 0..i-1.
fn task_set_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec(
        (
            0i64..20,
            1i64..6,
            proptest::collection::vec(any::<usize>(), 0..3),
        ),
        1..=max_tasks,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (start, length, potential_deps))| {
                let deps: BTreeSet<TaskId> = if i == 0 {
                    BTreeSet::new()
                } else {
                    potential_deps
                        .into_iter()
                        .map(|d| (d % i) as TaskId + 1)
                        .collect()
                };
                Task::new(i as TaskId + 1, start, start + length, deps)
            })
            .collect()
    })
}

fn independent_task_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec((0i64..20, 1i64..6), 1..=max_tasks).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (start, length))| Task::new(i as TaskId + 1, start, start + length, []))
            .collect()
    })
}

fn all_configs() -> Vec<SchedulerConfig> {
    let mut configs = Vec::new();
    for tie_break in [TieBreak::WindowStart, TieBreak::FewestDependents, TieBreak::TaskId] {
        for worker_selection in [WorkerSelection::EarliestFree, WorkerSelection::LowestId] {
            configs.push(SchedulerConfig {
                tie_break,
                worker_selection,
                ..SchedulerConfig::default()
            });
        }
    }
    configs
}

/// Largest number of placed tasks running at any single instant.
fn brute_force_concurrency(intervals: &[(Time, Time)]) -> usize {
    intervals
        .iter()
        .map(|&(t, _)| {
            intervals
                .iter()
                .filter(|&&(start, finish)| start <= t && t < finish)
                .count()
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn test_schedule_is_deterministic(tasks in task_set_strategy(12)) {
        let config = SchedulerConfig::default();
        let first = find_minimum_workers(&tasks, &config).unwrap();
        let second = find_minimum_workers(&tasks, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_every_policy_yields_a_valid_schedule(tasks in task_set_strategy(12)) {
        for config in all_configs() {
            let result = find_minimum_workers(&tasks, &config).unwrap();

            prop_assert!(result.diagnostics.violations.is_empty());
            prop_assert!(verify_schedule(&tasks, &result).is_empty());
            prop_assert!(result.min_workers >= 1);
            prop_assert!(result.min_workers <= tasks.len());
            prop_assert!(result.min_workers >= result.diagnostics.overlap_lower_bound);

            // Every task lands on exactly one worker.
            let mut seen: Vec<TaskId> = result.assignments.values().flatten().copied().collect();
            seen.sort_unstable();
            let expected: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
            prop_assert_eq!(seen, expected);
            prop_assert_eq!(result.task_order.len(), tasks.len());
        }
    }

    #[test]
    fn test_dependencies_finish_before_dependents_start(tasks in task_set_strategy(12)) {
        let result = find_minimum_workers(&tasks, &SchedulerConfig::default()).unwrap();
        for task in &tasks {
            let placement = result.placement(task.id).unwrap();
            prop_assert!(placement.actual_start >= task.window_start);
            prop_assert_eq!(
                Some(placement.actual_finish - placement.actual_start),
                task.duration()
            );
            prop_assert!(placement.slack >= 0);
            for dep in &task.dependencies {
                prop_assert!(result.placement(*dep).unwrap().actual_finish <= placement.actual_start);
            }
        }
    }

    #[test]
    fn test_overlap_bound_matches_brute_force(tasks in task_set_strategy(12)) {
        let result = find_minimum_workers(&tasks, &SchedulerConfig::default()).unwrap();
        let intervals: Vec<(Time, Time)> = result
            .placements
            .values()
            .map(|p| (p.actual_start, p.actual_finish))
            .collect();
        prop_assert_eq!(
            result.diagnostics.overlap_lower_bound,
            brute_force_concurrency(&intervals)
        );
    }

    #[test]
    fn test_independent_tasks_meet_the_overlap_bound(tasks in independent_task_strategy(12)) {
        let result = find_minimum_workers(&tasks, &SchedulerConfig::default()).unwrap();
        prop_assert_eq!(result.min_workers, result.diagnostics.overlap_lower_bound);
    }

    #[test]
    fn test_closing_a_loop_is_reported_as_cycle(tasks in task_set_strategy(12)) {
        prop_assume!(tasks.len() >= 2);
        let last = tasks.len() as TaskId;

        let mut tasks = tasks;
        tasks[0].dependencies.push(last);
        tasks[last as usize - 1].dependencies.push(1);

        match find_minimum_workers(&tasks, &SchedulerConfig::default()) {
            Err(ScheduleError::CyclicDependency(err)) => {
                prop_assert!(err.cycle.contains(&1));
                prop_assert!(err.cycle.contains(&last));
                prop_assert!(err.cycle.iter().all(|id| err.unresolved.contains(id)));
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }
    }
}
