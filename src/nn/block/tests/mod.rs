mod architecture;
mod factories;
