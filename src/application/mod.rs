pub mod appeals;
pub mod enforcement;
pub mod ledger;
pub mod review_appeal;
