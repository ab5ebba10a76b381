use loxbc::error::InterpretError;
use loxbc::utils::get_args;
use loxbc::vm::VM;
use std::io::Write;

const EXIT_USAGE: i32 = 64;
const EXIT_COMPILE_ERROR: i32 = 65;
const EXIT_RUNTIME_ERROR: i32 = 70;

fn main() {
  let args = get_args();
  let mut vm = VM::new();

  let result = match args.as_slice() {
    [] => repl(&mut vm),
    [path] => run_file(&mut vm, path),
    _ => {
      eprintln!("Usage: loxbc [path]");
      std::process::exit(EXIT_USAGE);
    }
  };

  if let Err(code) = result {
    std::process::exit(code);
  }
}

fn repl(vm: &mut VM) -> Result<(), i32> {
  let mut line = String::new();
  loop {
    print!("> ");
    std::io::stdout().flush().ok();

    line.clear();
    let bytes_read = std::io::stdin().read_line(&mut line).unwrap_or(0);
    if bytes_read == 0 {
      println!();
      return Ok(());
    }

    if let Err(err) = vm.interpret(&line) {
      report(err);
    }
  }
}

fn run_file(vm: &mut VM, path: &str) -> Result<(), i32> {
  match vm.interpret_file(path) {
    Ok(()) => Ok(()),
    Err(err @ InterpretError::CompileError) => {
      report(err);
      Err(EXIT_COMPILE_ERROR)
    }
    Err(err @ InterpretError::RuntimeError(_)) => {
      report(err);
      Err(EXIT_RUNTIME_ERROR)
    }
  }
}

fn report(err: InterpretError) {
  if let InterpretError::RuntimeError(message) = err {
    eprintln!("{message}");
  }
}
