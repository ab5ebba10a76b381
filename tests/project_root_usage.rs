use loxbc::vm::VM;
use project_root::get_project_root;
use std::fs::read_to_string;

fn fixture_path(name: &str) -> String {
  let project_root = get_project_root().expect("There is no project root");
  project_root.to_str().unwrap().to_owned() + "/tests/fixtures/" + name
}

#[test]
fn runs_scopes_and_loops_fixture() {
  let source = read_to_string(fixture_path("scopes_and_loops.lox")).unwrap();
  let mut vm = VM::new();
  assert!(vm.interpret(&source).is_ok());
}
