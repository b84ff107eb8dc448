mod support;

mod steering_and_selection;
