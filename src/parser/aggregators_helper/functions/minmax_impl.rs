use serde_json::Value;

use crate::{database::{round_to_json, CellValue}, error::Result, parser::aggregators_helper::{functions::numeric_arg, Accumulator, AggregateImpl}};

pub struct MinImpl;
pub struct MaxImpl;

impl AggregateImpl for MinImpl {
    fn name(&self) -> &'static str { "min" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(ExtremaAcc::new_min()) }
}
impl AggregateImpl for MaxImpl {
    fn name(&self) -> &'static str { "max" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(ExtremaAcc::new_max()) }
}

enum Mode { Min, Max }

struct ExtremaAcc {
    mode: Mode,
    current: Option<f64>,
}

impl ExtremaAcc {
    fn new_min() -> Self { Self { mode: Mode::Min, current: None } }
    fn new_max() -> Self { Self { mode: Mode::Max, current: None } }

    fn name(&self) -> &'static str {
        match self.mode { Mode::Min => "min", Mode::Max => "max" }
    }

    fn better(mode: &Mode, current: f64, candidate: f64) -> bool {
        match mode {
            Mode::Min => candidate < current,
            Mode::Max => candidate > current,
        }
    }
}

impl Accumulator for ExtremaAcc {
    fn update(&mut self, args: &[CellValue<'_>]) -> Result<()> {
        let Some(v) = numeric_arg(self.name(), args)? else {
            return Ok(());
        };
        match self.current {
            None => self.current = Some(v),
            Some(cur) => {
                if Self::better(&self.mode, cur, v) {
                    self.current = Some(v);
                }
            }
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        self.current.map(round_to_json).unwrap_or(Value::Null)
    }
}
