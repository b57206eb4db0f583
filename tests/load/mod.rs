mod attack_test;
