use sluice::{Direction, HistoryManager, Shell, ShellState};

#[test]
fn test_recorded_lines_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");

    let lines = ["echo one", "ls -l | wc", "echo \"unterminated", "cd nowhere"];
    {
        let mut history = HistoryManager::open(&path);
        for line in lines {
            history.record(line);
        }
    }

    let reloaded = HistoryManager::open(&path);
    assert_eq!(reloaded.all(), &lines);
}

#[test]
fn test_shell_records_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let state = ShellState::with_dir(dir.path()).unwrap();
    let mut shell = Shell::with_parts(state, HistoryManager::open(&path), None);

    shell.run_line("echo ok");
    shell.run_line("no-such-command-sluice");
    shell.run_line("echo 'open");
    shell.run_line("");

    let expected = ["echo ok", "no-such-command-sluice", "echo 'open"];
    assert_eq!(shell.history().all(), &expected);
    assert_eq!(HistoryManager::open(&path).all(), &expected);

    let listing = shell.run_line("history 2").output;
    assert_eq!(listing, "    3  echo 'open\n    4  history 2\n");
}

#[test]
fn test_navigation() {
    let mut history = HistoryManager::in_memory();
    history.record("first");
    history.record("second");

    assert_eq!(history.navigate(Direction::Previous).as_deref(), Some("second"));
    assert_eq!(history.navigate(Direction::Previous).as_deref(), Some("first"));
    assert_eq!(history.navigate(Direction::Previous), None);
    assert_eq!(history.navigate(Direction::Next).as_deref(), Some("second"));
    assert_eq!(history.navigate(Direction::Next).as_deref(), Some(""));
    assert_eq!(history.navigate(Direction::Next), None);
}

#[test]
fn test_history_file_commands() {
    let dir = tempfile::tempdir().unwrap();
    let state = ShellState::with_dir(dir.path()).unwrap();
    let mut shell = Shell::with_parts(state, HistoryManager::in_memory(), None);

    shell.run_line("echo a");
    let result = shell.run_line("history -w saved");
    assert_eq!(result.output, "Wrote 2 commands to saved\n");

    shell.run_line("echo b");
    let result = shell.run_line("history -a saved");
    assert_eq!(result.output, "Appended 2 new commands to saved\n");

    let result = shell.run_line("history -r saved");
    assert_eq!(result.output, "Loaded 4 commands from saved\n");
    assert_eq!(
        shell.history().all(),
        &["echo a", "history -w saved", "echo b", "history -a saved"]
    );
}

#[test]
fn test_multiline_line_reloads_as_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let state = ShellState::with_dir(dir.path()).unwrap();
    let mut shell = Shell::with_parts(state, HistoryManager::open(&path), None);

    shell.run_line("echo a\necho b");
    shell.run_line("echo 'back\\slash'");

    let reloaded = HistoryManager::open(&path);
    assert_eq!(reloaded.all(), shell.history().all());
    assert_eq!(reloaded.len(), 2);
}
