use scheduler::ProcessSpec;

use crate::error::ParseError;

/// A parsed input file: the processes and the quantum they are run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub processes: Vec<ProcessSpec>,
    pub quantum: i64,
}

fn number(line: usize, field: &'static str, value: &str) -> Result<i64, ParseError> {
    value.trim().parse().map_err(|_| ParseError::NotANumber {
        line,
        field,
        value: value.to_string(),
    })
}

/// Parse the textual input format.
///
/// ```text
/// 3
/// A 0 5 2
/// B 1 3 1
/// C 4 2 3
/// quantum=2
/// ```
///
/// The first line holds the number of processes `n`, the next `n` lines hold
/// `name arrival duration priority`, and the last line holds the quantum after
/// its last `=`. Values are not range-checked here, that is the engine's job.
pub fn parse_input(input: &str) -> Result<Workload, ParseError> {
    let lines: Vec<&str> = input.trim().lines().map(str::trim).collect();
    let Some(first) = lines.first().filter(|line| !line.is_empty()) else {
        return Err(ParseError::Empty);
    };

    let count: usize = first.parse().map_err(|_| ParseError::BadCount {
        value: first.to_string(),
    })?;
    let needed = count.checked_add(2);
    if needed.map_or(true, |needed| lines.len() < needed) {
        return Err(ParseError::MissingLines {
            expected: needed.unwrap_or(usize::MAX),
            found: lines.len(),
        });
    }

    let mut processes = Vec::with_capacity(count);
    for (index, line) in lines[1..=count].iter().enumerate() {
        let line_number = index + 2;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, arrival, duration, priority] = fields[..] else {
            return Err(ParseError::WrongFieldCount {
                line: line_number,
                found: fields.len(),
            });
        };
        processes.push(ProcessSpec::new(
            name,
            number(line_number, "arrival", arrival)?,
            number(line_number, "duration", duration)?,
            number(line_number, "priority", priority)?,
        ));
    }

    let last = lines[lines.len() - 1];
    let value = last.rsplit('=').next().unwrap_or(last);
    let quantum = number(lines.len(), "quantum", value)?;

    Ok(Workload { processes, quantum })
}
