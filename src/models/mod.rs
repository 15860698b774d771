pub mod union;
pub mod special_day;

pub use union::{Union, UnionInput, UnionRequest};
pub use special_day::{
    parse_day,
    BulkSpecialDaysRequest,
    SpecialDay,
    SpecialDayInput,
    SpecialDayRequest,
};
