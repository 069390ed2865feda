use serde_json::Value;

use crate::{database::{round_to_json, CellValue}, error::Result, parser::aggregators_helper::{functions::numeric_arg, Accumulator, AggregateImpl}};

pub struct AvgImpl;

impl AggregateImpl for AvgImpl {
    fn name(&self) -> &'static str { "avg" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(AvgAcc { sum: 0.0, count: 0 })
    }
}

struct AvgAcc {
    sum: f64,
    count: u64,
}

impl Accumulator for AvgAcc {
    fn update(&mut self, args: &[CellValue<'_>]) -> Result<()> {
        if let Some(v) = numeric_arg("avg", args)? {
            self.sum += v;
            self.count += 1;
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        if self.count == 0 {
            return Value::Null;
        }
        round_to_json(self.sum / self.count as f64)
    }
}
