/// Points / point differences. Usually increments of 100.
pub type GamePoints = i64;
