mod test_state_sampling;
