use serde_json::Value;

use crate::{database::{round_to_json, CellValue}, error::Result, parser::aggregators_helper::{functions::numeric_arg, Accumulator, AggregateImpl}};

pub struct SumImpl;

impl AggregateImpl for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(SumAcc { sum: None })
    }
}

struct SumAcc {
    sum: Option<f64>,
}

impl Accumulator for SumAcc {
    fn update(&mut self, args: &[CellValue<'_>]) -> Result<()> {
        if let Some(v) = numeric_arg("sum", args)? {
            self.sum = Some(self.sum.unwrap_or(0.0) + v);
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        self.sum.map(round_to_json).unwrap_or(Value::Null)
    }
}
