mod layer_conv2d;
mod layer_identity;
