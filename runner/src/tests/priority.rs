use function_name::named;
use scheduler::{PriorityConfig, PriorityOrder};

use super::{run, simulate};

#[test]
#[named]
pub fn lookahead_truncation() {
    let logs = simulate(
        "2
L 0 10 1
H 3 2 5
quantum=4",
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
pub fn ascending_without_lookahead() {
    let logs = simulate(
        "3
A 0 4 2
B 1 2 1
C 2 3 2
quantum=2",
        PriorityConfig {
            order: PriorityOrder::Ascending,
            lookahead: false,
        },
    );

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}
