pub mod due_date;
