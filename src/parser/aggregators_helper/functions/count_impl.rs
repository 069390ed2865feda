use serde_json::Value;

use crate::{database::CellValue, error::{EngineError, Result}, parser::aggregators_helper::{Accumulator, AggregateImpl}};

pub struct CountImpl;

impl AggregateImpl for CountImpl {
    fn name(&self) -> &'static str { "count" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountAcc { cnt: 0 })
    }
}

struct CountAcc {
    cnt: u64,
}

impl Accumulator for CountAcc {
    fn update(&mut self, args: &[CellValue<'_>]) -> Result<()> {
        match args {
            // count(): every row
            [] => self.cnt += 1,
            // count(field): rows where the field is present
            [v] => {
                if !v.is_null() {
                    self.cnt += 1;
                }
            }
            _ => return Err(EngineError::UnsupportedAggregate("count() takes at most one column".into())),
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        Value::from(self.cnt)
    }
}
