pub mod faceit_stub;
