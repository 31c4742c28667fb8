use crewplan::{
    find_minimum_workers, MalformedInput, ScheduleError, ScheduleResult, SchedulerConfig, Task,
    TaskId, Time,
};

fn make_task(id: TaskId, start: Time, end: Time, deps: &[TaskId]) -> Task {
    Task::new(id, start, end, deps.iter().copied())
}

fn schedule(tasks: &[Task]) -> Result<ScheduleResult, ScheduleError> {
    find_minimum_workers(tasks, &SchedulerConfig::default())
}

#[test]
fn single_task_gets_one_worker() {
    let result = schedule(&[make_task(1, 0, 3, &[])]).unwrap();

    assert_eq!(result.min_workers, 1);
    assert_eq!(result.worker_of(1), Some(1));
    assert_eq!(result.actual_start(1), Some(0));
}

#[test]
fn pairwise_overlapping_tasks_need_three_workers() {
    let tasks = vec![
        make_task(1, 0, 3, &[]),
        make_task(2, 1, 4, &[]),
        make_task(3, 2, 5, &[]),
    ];
    let result = schedule(&tasks).unwrap();

    assert_eq!(result.min_workers, 3);
    assert_eq!(result.assignments.len(), 3);
}

#[test]
fn dependency_shifts_start_and_worker_count() {
    let tasks = vec![
        make_task(1, 0, 3, &[]),
        make_task(2, 1, 4, &[1]),
        make_task(3, 0, 2, &[]),
    ];
    let result = schedule(&tasks).unwrap();

    // Raw windows [0,3) [1,4) [0,2) would overlap three ways at t=1;
    // with 2 pushed to [3,6) only two tasks ever run at once.
    assert_eq!(result.min_workers, 2);
    assert_eq!(result.actual_start(2), Some(3));
    let first = result.placement(1).unwrap();
    let second = result.placement(2).unwrap();
    assert!(first.actual_finish <= second.actual_start);
}

#[test]
fn cyclic_input_lists_both_tasks() {
    let tasks = vec![make_task(1, 0, 3, &[2]), make_task(2, 1, 4, &[1])];

    match schedule(&tasks) {
        Err(ScheduleError::CyclicDependency(err)) => {
            assert_eq!(err.cycle, vec![1, 2]);
            assert_eq!(err.unresolved, vec![1, 2]);
        }
        other => panic!("expected a cyclic dependency error, got {:?}", other),
    }
}

#[test]
fn duplicate_id_is_malformed() {
    let tasks = vec![make_task(1, 0, 3, &[]), make_task(1, 1, 2, &[])];

    assert!(matches!(
        schedule(&tasks),
        Err(ScheduleError::MalformedInput(MalformedInput::DuplicateId { task: 1 }))
    ));
}

#[test]
fn empty_input_is_malformed_by_default() {
    assert!(matches!(
        schedule(&[]),
        Err(ScheduleError::MalformedInput(MalformedInput::Empty))
    ));
}

#[test]
fn eight_task_project() {
    let tasks = vec![
        make_task(1, 0, 3, &[]),
        make_task(2, 1, 4, &[]),
        make_task(3, 2, 6, &[1]),
        make_task(4, 3, 7, &[1, 2]),
        make_task(5, 4, 8, &[3]),
        make_task(6, 5, 9, &[4]),
        make_task(7, 6, 10, &[4, 5]),
        make_task(8, 7, 11, &[6, 7]),
    ];
    let result = schedule(&tasks).unwrap();

    assert_eq!(result.min_workers, 2);
    assert_eq!(result.task_order, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(result.assignments[&1], vec![1, 3, 5, 7]);
    assert_eq!(result.assignments[&2], vec![2, 4, 6, 8]);

    let starts: Vec<Time> = (1..=8).map(|id| result.actual_start(id).unwrap()).collect();
    assert_eq!(starts, vec![0, 1, 3, 4, 7, 8, 11, 15]);

    // 2 -> 4 -> 6 is the only path with room; it trails the 1-3-5-7-8 chain by 3
    let latest_starts: Vec<Time> = (1..=8)
        .map(|id| result.placement(id).unwrap().latest_start)
        .collect();
    assert_eq!(latest_starts, vec![0, 4, 3, 7, 7, 11, 11, 15]);
    let slacks: Vec<Time> = (1..=8).map(|id| result.placement(id).unwrap().slack).collect();
    assert_eq!(slacks, vec![0, 3, 0, 3, 0, 3, 0, 0]);

    let diagnostics = &result.diagnostics;
    assert_eq!(diagnostics.makespan, 19);
    assert_eq!(diagnostics.max_slack, 3);
    assert_eq!(diagnostics.critical_tasks, vec![1, 3, 5, 7, 8]);
    assert_eq!(diagnostics.window_overruns, vec![3, 4, 5, 6, 7, 8]);
    assert_eq!(diagnostics.overlap_lower_bound, 2);
    assert!(diagnostics.violations.is_empty());
}

#[test]
fn tasks_parse_from_json_records() {
    let json = r#"[
        {"id": 1, "start": 0, "end": 3, "dependencies": []},
        {"id": 2, "start": 1, "end": 4, "dependencies": [1]},
        {"id": 3, "window_start": 0, "window_end": 2}
    ]"#;
    let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
    let result = schedule(&tasks).unwrap();

    assert_eq!(result.min_workers, 2);

    let output = serde_json::to_value(&result).unwrap();
    assert_eq!(output["min_workers"], 2);
    assert_eq!(output["task_order"], serde_json::json!([1, 3, 2]));
    assert_eq!(output["assignments"]["2"], serde_json::json!([3, 2]));
    assert_eq!(output["placements"]["2"]["actual_start"], 3);
}

#[test]
fn input_tasks_are_not_modified() {
    let tasks = vec![make_task(1, 0, 3, &[]), make_task(2, 1, 4, &[1])];
    let before = tasks.clone();
    let _ = schedule(&tasks).unwrap();
    assert_eq!(tasks, before);
}

#[test]
fn disjoint_task_sets_schedule_in_parallel_threads() {
    let sets: Vec<Vec<Task>> = (0..4)
        .map(|k| {
            (1..=6)
                .map(|i| make_task(i, k + i as Time, k + i as Time + 3, &[]))
                .collect()
        })
        .collect();

    let expected: Vec<ScheduleResult> = sets.iter().map(|set| schedule(set).unwrap()).collect();

    let handles: Vec<_> = sets
        .into_iter()
        .map(|set| std::thread::spawn(move || schedule(&set).unwrap()))
        .collect();

    for (handle, expected) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
