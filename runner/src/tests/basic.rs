use function_name::named;
use scheduler::PriorityConfig;

use super::{run, simulate};

#[test]
#[named]
pub fn late_arrival_waits() {
    let logs = simulate(
        "2
A 0 3 0
B 1 2 0
quantum=2",
        PriorityConfig::default(),
    );

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn arrival_during_slice() {
    let logs = simulate(
        "2
A 0 5 0
B 1 3 0
quantum=2",
        PriorityConfig::default(),
    );

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}
